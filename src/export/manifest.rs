//! IMS manifest (`imsmanifest.xml`) generation.
//!
//! Identifiers are positional: module `n` (1-based) gets `ITEM-n` and
//! `RES-n`; the shared launch resource is `RES-0`, referenced on 1.2 by the
//! course item `ITEM-0`. Every `identifierref` therefore names exactly one
//! resource.

use std::fmt::Write;

use crate::model::{FormationExport, MasteryScore, ScormVersion};
use crate::render::escape_xml;

use super::{INDEX_PAGE, QUIZ_PAGE, SHIM_FILE, STYLESHEET};

const SHARED_ITEM: &str = "ITEM-0";
const SHARED_RESOURCE: &str = "RES-0";

/// Parameters for manifest generation.
#[derive(Debug, Clone, Copy)]
pub struct ManifestParams<'a> {
    pub version: ScormVersion,
    pub mastery_score: MasteryScore,
    /// List `quiz.html` in the shared resource.
    pub include_quiz: bool,
    /// Language tag for the LOM title/description.
    pub language: &'a str,
}

/// Generate the manifest for `formation`.
pub fn generate_manifest(formation: &FormationExport, params: &ManifestParams) -> String {
    let id = sanitize_identifier(formation.id());
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    match params.version {
        ScormVersion::V1_2 => {
            writeln!(
                xml,
                r#"<manifest identifier="SCORM_{id}" version="1.0"
  xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
  xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2"
  xmlns:imsmd="http://www.imsglobal.org/xsd/imsmd_rootv1p2p1">"#
            )
            .unwrap();
        }
        ScormVersion::V2004 => {
            writeln!(
                xml,
                r#"<manifest identifier="SCORM_{id}" version="1.0"
  xmlns="http://www.imsglobal.org/xsd/imscp_v1p1"
  xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3"
  xmlns:adlseq="http://www.adlnet.org/xsd/adlseq_v1p3"
  xmlns:adlnav="http://www.adlnet.org/xsd/adlnav_v1p3"
  xmlns:imsss="http://www.imsglobal.org/xsd/imsss">"#
            )
            .unwrap();
        }
    }

    write_metadata(&mut xml, formation, params);

    writeln!(xml, "  <organizations default=\"ORG-{id}\">").unwrap();
    writeln!(xml, "    <organization identifier=\"ORG-{id}\">").unwrap();
    writeln!(xml, "      <title>{}</title>", escape_xml(formation.title())).unwrap();
    match params.version {
        ScormVersion::V1_2 => write_items_1_2(&mut xml, formation, params.mastery_score),
        ScormVersion::V2004 => write_items_2004(&mut xml, formation),
    }
    xml.push_str("    </organization>\n");
    xml.push_str("  </organizations>\n");

    write_resources(&mut xml, formation, params);

    xml.push_str("</manifest>\n");
    xml
}

fn write_metadata(xml: &mut String, formation: &FormationExport, params: &ManifestParams) {
    let lang = escape_xml(params.language);
    xml.push_str("  <metadata>\n");
    xml.push_str("    <schema>ADL SCORM</schema>\n");
    writeln!(
        xml,
        "    <schemaversion>{}</schemaversion>",
        params.version.schema_version()
    )
    .unwrap();

    let title = escape_xml(formation.title());
    let description = formation.description().map(escape_xml);
    match params.version {
        ScormVersion::V1_2 => {
            xml.push_str("    <imsmd:lom>\n      <imsmd:general>\n");
            writeln!(
                xml,
                "        <imsmd:title><imsmd:langstring xml:lang=\"{lang}\">{title}</imsmd:langstring></imsmd:title>"
            )
            .unwrap();
            if let Some(desc) = description {
                writeln!(
                    xml,
                    "        <imsmd:description><imsmd:langstring xml:lang=\"{lang}\">{desc}</imsmd:langstring></imsmd:description>"
                )
                .unwrap();
            }
            xml.push_str("      </imsmd:general>\n    </imsmd:lom>\n");
        }
        ScormVersion::V2004 => {
            xml.push_str("    <lom xmlns=\"http://ltsc.ieee.org/xsd/LOM\">\n      <general>\n");
            writeln!(
                xml,
                "        <title><string language=\"{lang}\">{title}</string></title>"
            )
            .unwrap();
            if let Some(desc) = description {
                writeln!(
                    xml,
                    "        <description><string language=\"{lang}\">{desc}</string></description>"
                )
                .unwrap();
            }
            xml.push_str("      </general>\n    </lom>\n");
        }
    }
    xml.push_str("  </metadata>\n");
}

/// 1.2: a course item carrying the mastery score, modules nested inside.
fn write_items_1_2(xml: &mut String, formation: &FormationExport, mastery: MasteryScore) {
    if formation.modules().is_empty() {
        return;
    }
    writeln!(
        xml,
        "      <item identifier=\"{SHARED_ITEM}\" identifierref=\"{SHARED_RESOURCE}\">"
    )
    .unwrap();
    writeln!(xml, "        <title>{}</title>", escape_xml(formation.title())).unwrap();
    writeln!(xml, "        <adlcp:masteryscore>{mastery}</adlcp:masteryscore>").unwrap();
    for module in formation.modules() {
        let n = module.position();
        writeln!(xml, "        <item identifier=\"ITEM-{n}\" identifierref=\"RES-{n}\">").unwrap();
        writeln!(xml, "          <title>{}</title>", escape_xml(module.title())).unwrap();
        xml.push_str("        </item>\n");
    }
    xml.push_str("      </item>\n");
}

/// 2004: one item per module with content-driven sequencing.
fn write_items_2004(xml: &mut String, formation: &FormationExport) {
    for module in formation.modules() {
        let n = module.position();
        writeln!(xml, "      <item identifier=\"ITEM-{n}\" identifierref=\"RES-{n}\">").unwrap();
        writeln!(xml, "        <title>{}</title>", escape_xml(module.title())).unwrap();
        xml.push_str("        <imsss:sequencing>\n");
        xml.push_str(
            "          <imsss:deliveryControls completionSetByContent=\"true\" objectiveSetByContent=\"true\"/>\n",
        );
        xml.push_str("        </imsss:sequencing>\n");
        xml.push_str("      </item>\n");
    }
}

fn write_resources(xml: &mut String, formation: &FormationExport, params: &ManifestParams) {
    let scorm_type = match params.version {
        ScormVersion::V1_2 => "adlcp:scormtype",
        ScormVersion::V2004 => "adlcp:scormType",
    };

    xml.push_str("  <resources>\n");

    writeln!(
        xml,
        "    <resource identifier=\"{SHARED_RESOURCE}\" type=\"webcontent\" {scorm_type}=\"sco\" href=\"{INDEX_PAGE}\">"
    )
    .unwrap();
    let mut shared = vec![INDEX_PAGE];
    if params.include_quiz {
        shared.push(QUIZ_PAGE);
    }
    shared.extend([SHIM_FILE, STYLESHEET]);
    for file in shared {
        writeln!(xml, "      <file href=\"{file}\"/>").unwrap();
    }
    xml.push_str("    </resource>\n");

    for module in formation.modules() {
        let n = module.position();
        let page = module.page_name();
        writeln!(
            xml,
            "    <resource identifier=\"RES-{n}\" type=\"webcontent\" {scorm_type}=\"sco\" href=\"{page}\">"
        )
        .unwrap();
        for file in [page.as_str(), SHIM_FILE, STYLESHEET] {
            writeln!(xml, "      <file href=\"{file}\"/>").unwrap();
        }
        xml.push_str("    </resource>\n");
    }

    xml.push_str("  </resources>\n");
}

/// Restrict an id to characters valid in an XML `ID`.
fn sanitize_identifier(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "formation".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FormationRecord, ModuleRecord};
    use crate::normalize::normalize_formation;

    fn formation(titles: &[&str]) -> FormationExport {
        let record = FormationRecord {
            id: "f-1".into(),
            titre: "Q&A <Intro>".into(),
            description: Some("l'essentiel".into()),
            organization_id: None,
            modules: titles
                .iter()
                .enumerate()
                .map(|(i, t)| ModuleRecord::new(format!("m{i}"), *t, i as i32))
                .collect(),
            evaluations_data: None,
        };
        normalize_formation(&record).unwrap()
    }

    fn params(version: ScormVersion) -> ManifestParams<'static> {
        ManifestParams {
            version,
            mastery_score: MasteryScore::new(70),
            include_quiz: false,
            language: "fr",
        }
    }

    #[test]
    fn test_1_2_structure() {
        let xml = generate_manifest(&formation(&["A", "B"]), &params(ScormVersion::V1_2));
        assert!(xml.contains("<schemaversion>1.2</schemaversion>"));
        assert!(xml.contains("<adlcp:masteryscore>70</adlcp:masteryscore>"));
        assert!(xml.contains(r#"<item identifier="ITEM-0" identifierref="RES-0">"#));
        assert!(xml.contains(r#"<item identifier="ITEM-2" identifierref="RES-2">"#));
        assert!(xml.contains(r#"adlcp:scormtype="sco""#));
        assert!(!xml.contains("imsss:"));
    }

    #[test]
    fn test_2004_structure() {
        let xml = generate_manifest(&formation(&["A", "B"]), &params(ScormVersion::V2004));
        assert!(xml.contains("<schemaversion>2004 4th Edition</schemaversion>"));
        assert!(xml.contains("xmlns:adlseq="));
        assert!(xml.contains("xmlns:adlnav="));
        assert_eq!(xml.matches("<imsss:sequencing>").count(), 2);
        assert!(xml.contains(r#"completionSetByContent="true" objectiveSetByContent="true""#));
        assert!(!xml.contains("ITEM-0"));
        assert!(!xml.contains("masteryscore"));
        assert!(xml.contains(r#"adlcp:scormType="sco""#));
    }

    #[test]
    fn test_titles_escaped() {
        let xml = generate_manifest(&formation(&["\"x\" & y"]), &params(ScormVersion::V1_2));
        assert!(xml.contains("<title>Q&amp;A &lt;Intro&gt;</title>"));
        assert!(xml.contains("<title>&quot;x&quot; &amp; y</title>"));
        assert!(xml.contains("l&apos;essentiel"));
    }

    #[test]
    fn test_empty_formation_has_no_items() {
        for version in [ScormVersion::V1_2, ScormVersion::V2004] {
            let xml = generate_manifest(&formation(&[]), &params(version));
            assert!(!xml.contains("<item "));
            assert_eq!(xml.matches("<resource ").count(), 1);
        }
    }

    #[test]
    fn test_quiz_listed_in_shared_resource() {
        let mut p = params(ScormVersion::V1_2);
        p.include_quiz = true;
        let xml = generate_manifest(&formation(&["A"]), &p);
        assert!(xml.contains(r#"<file href="quiz.html"/>"#));
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("abc-123_x.y"), "abc-123_x.y");
        assert_eq!(sanitize_identifier("a b/c\"d"), "a_b_c_d");
        assert_eq!(sanitize_identifier(""), "formation");
    }
}
