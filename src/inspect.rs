//! Reading SCORM packages back: manifest parsing and archive checks.
//!
//! Used to verify generated packages and to inspect packages produced
//! elsewhere. Only the parts of the manifest that matter for launching are
//! read: organization tree, resources and their files, edition and mastery.

use std::collections::{BTreeSet, HashSet};
use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::export::MANIFEST_FILE;
use crate::model::ScormVersion;

/// An `<item>` of the default organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub identifier: String,
    pub identifierref: Option<String>,
    pub title: String,
    /// Nesting level, 0 for items directly under the organization.
    pub depth: usize,
    pub has_sequencing: bool,
}

/// A `<resource>` and the files it lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResource {
    pub identifier: String,
    pub href: Option<String>,
    pub scorm_type: Option<String>,
    pub files: Vec<String>,
}

/// What `imsmanifest.xml` declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSummary {
    pub identifier: String,
    /// Edition from `<schemaversion>`, else from the namespace declarations.
    pub version: Option<ScormVersion>,
    pub schema_version: Option<String>,
    /// Title of the organization.
    pub title: Option<String>,
    pub items: Vec<ManifestItem>,
    pub resources: Vec<ManifestResource>,
    pub mastery_score: Option<u8>,
}

impl ManifestSummary {
    pub fn resource(&self, identifier: &str) -> Option<&ManifestResource> {
        self.resources.iter().find(|r| r.identifier == identifier)
    }

    /// `identifierref` values that name no resource.
    pub fn dangling_refs(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| item.identifierref.as_deref())
            .filter(|r| self.resource(r).is_none())
            .collect()
    }

    /// Identifiers used more than once across items and resources.
    pub fn duplicate_identifiers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes = BTreeSet::new();
        let ids = self
            .items
            .iter()
            .map(|i| i.identifier.as_str())
            .chain(self.resources.iter().map(|r| r.identifier.as_str()));
        for id in ids {
            if !seen.insert(id) {
                dupes.insert(id.to_string());
            }
        }
        dupes.into_iter().collect()
    }

    /// Fail on dangling references or duplicate identifiers.
    pub fn check(&self) -> Result<()> {
        let dangling = self.dangling_refs();
        if !dangling.is_empty() {
            return Err(Error::InvalidManifest(format!(
                "unresolved identifierref: {}",
                dangling.join(", ")
            )));
        }
        let dupes = self.duplicate_identifiers();
        if !dupes.is_empty() {
            return Err(Error::InvalidManifest(format!(
                "duplicate identifiers: {}",
                dupes.join(", ")
            )));
        }
        Ok(())
    }
}

/// Parse a manifest document.
///
/// Fails on characters XML 1.0 forbids, which `quick-xml` passes through.
pub fn parse_manifest(content: &str) -> Result<ManifestSummary> {
    if let Some(pos) = content.find(is_forbidden_xml_char) {
        return Err(Error::InvalidManifest(format!(
            "character not allowed in XML at byte {pos}"
        )));
    }

    let mut reader = Reader::from_str(content);

    let mut summary = ManifestSummary::default();
    let mut namespace_version = None;
    let mut saw_root = false;

    let mut elements: Vec<Vec<u8>> = Vec::new();
    let mut open_items: Vec<usize> = Vec::new();
    let mut open_resource: Option<usize> = None;
    let mut buf_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                let local = local_name(name.as_ref()).to_vec();
                if !saw_root {
                    check_root(&local)?;
                    saw_root = true;
                    read_root(&e, &mut summary, &mut namespace_version);
                }
                match local.as_slice() {
                    b"item" => {
                        let item = read_item(&e, open_items.len());
                        summary.items.push(item);
                        open_items.push(summary.items.len() - 1);
                    }
                    b"resource" => {
                        summary.resources.push(read_resource(&e));
                        open_resource = Some(summary.resources.len() - 1);
                    }
                    b"file" => push_file(&e, &mut summary, open_resource),
                    b"sequencing" => mark_sequencing(&mut summary, &open_items),
                    _ => {}
                }
                buf_text.clear();
                elements.push(local);
            }
            Event::Empty(e) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if !saw_root {
                    check_root(local)?;
                    saw_root = true;
                    read_root(&e, &mut summary, &mut namespace_version);
                }
                match local {
                    b"item" => summary.items.push(read_item(&e, open_items.len())),
                    b"resource" => summary.resources.push(read_resource(&e)),
                    b"file" => push_file(&e, &mut summary, open_resource),
                    b"sequencing" => mark_sequencing(&mut summary, &open_items),
                    _ => {}
                }
            }
            Event::Text(e) => {
                buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::CData(e) => {
                buf_text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    buf_text.push_str(&resolved);
                }
            }
            Event::End(_) => {
                let Some(local) = elements.pop() else {
                    continue;
                };
                let parent = elements.last().map(Vec::as_slice);
                let text = buf_text.trim().to_string();

                match (local.as_slice(), parent) {
                    (b"title", Some(b"item")) => {
                        if let Some(&idx) = open_items.last() {
                            summary.items[idx].title = text;
                        }
                    }
                    (b"title", Some(b"organization")) if summary.title.is_none() => {
                        summary.title = Some(text);
                    }
                    (b"schemaversion", _) => summary.schema_version = Some(text),
                    (b"masteryscore", _) => summary.mastery_score = text.parse().ok(),
                    (b"item", _) => {
                        open_items.pop();
                    }
                    (b"resource", _) => open_resource = None,
                    _ => {}
                }
                buf_text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::InvalidManifest("empty document".into()));
    }

    summary.version = summary
        .schema_version
        .as_deref()
        .and_then(version_from_schema)
        .or(namespace_version);

    Ok(summary)
}

/// An opened package: its manifest, entries and missing files.
#[derive(Debug, Clone)]
pub struct PackageSummary {
    pub manifest: ManifestSummary,
    /// Archive entries, in archive order.
    pub entries: Vec<String>,
    /// Files referenced by resources but absent from the archive.
    pub missing_files: Vec<String>,
}

impl PackageSummary {
    pub fn is_complete(&self) -> bool {
        self.missing_files.is_empty()
    }
}

/// Open a zip package and check its manifest against its entries.
pub fn inspect_package(bytes: &[u8]) -> Result<PackageSummary> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        entries.push(archive.by_index(i)?.name().to_string());
    }

    let mut raw = Vec::new();
    archive
        .by_name(MANIFEST_FILE)
        .map_err(|_| Error::InvalidManifest(format!("{MANIFEST_FILE} not found in archive")))?
        .read_to_end(&mut raw)?;
    let content = String::from_utf8(strip_bom(&raw).to_vec())?;
    let manifest = parse_manifest(&content)?;

    let present: HashSet<&str> = entries.iter().map(String::as_str).collect();
    let mut missing = BTreeSet::new();
    for resource in &manifest.resources {
        for file in resource.href.iter().chain(&resource.files) {
            if !present.contains(file.as_str()) {
                missing.insert(file.clone());
            }
        }
    }

    tracing::debug!(
        entries = entries.len(),
        resources = manifest.resources.len(),
        missing = missing.len(),
        "package inspected"
    );

    Ok(PackageSummary {
        manifest,
        entries,
        missing_files: missing.into_iter().collect(),
    })
}

fn check_root(local: &[u8]) -> Result<()> {
    if local == b"manifest" {
        Ok(())
    } else {
        Err(Error::InvalidManifest(format!(
            "root element is <{}>, expected <manifest>",
            String::from_utf8_lossy(local)
        )))
    }
}

fn read_root(e: &BytesStart, summary: &mut ManifestSummary, ns_version: &mut Option<ScormVersion>) {
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        let value = attr_string(&attr.value);
        if key == b"identifier" {
            summary.identifier = value;
        } else if key.starts_with(b"xmlns") {
            if value.contains("adlcp_rootv1p2") {
                *ns_version = Some(ScormVersion::V1_2);
            } else if value.contains("adlcp_v1p3") {
                *ns_version = Some(ScormVersion::V2004);
            }
        }
    }
}

fn read_item(e: &BytesStart, depth: usize) -> ManifestItem {
    let mut item = ManifestItem {
        identifier: String::new(),
        identifierref: None,
        title: String::new(),
        depth,
        has_sequencing: false,
    };
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"identifier" => item.identifier = attr_string(&attr.value),
            b"identifierref" => item.identifierref = Some(attr_string(&attr.value)),
            _ => {}
        }
    }
    item
}

fn read_resource(e: &BytesStart) -> ManifestResource {
    let mut resource = ManifestResource {
        identifier: String::new(),
        href: None,
        scorm_type: None,
        files: Vec::new(),
    };
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        match key {
            b"identifier" => resource.identifier = attr_string(&attr.value),
            b"href" => resource.href = Some(attr_string(&attr.value)),
            _ if local_name(key).eq_ignore_ascii_case(b"scormtype") => {
                resource.scorm_type = Some(attr_string(&attr.value));
            }
            _ => {}
        }
    }
    resource
}

fn push_file(e: &BytesStart, summary: &mut ManifestSummary, open_resource: Option<usize>) {
    let Some(idx) = open_resource else {
        return;
    };
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"href" {
            summary.resources[idx].files.push(attr_string(&attr.value));
        }
    }
}

fn mark_sequencing(summary: &mut ManifestSummary, open_items: &[usize]) {
    if let Some(&idx) = open_items.last() {
        summary.items[idx].has_sequencing = true;
    }
}

fn version_from_schema(schema: &str) -> Option<ScormVersion> {
    if schema.contains("2004") || schema.starts_with("CAM 1.3") {
        Some(ScormVersion::V2004)
    } else if schema == "1.2" {
        Some(ScormVersion::V1_2)
    } else {
        None
    }
}

fn attr_string(raw: &[u8]) -> String {
    let raw = String::from_utf8_lossy(raw);
    match quick_xml::escape::unescape(&raw) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => raw.into_owned(),
    }
}

fn is_forbidden_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

/// Extract local name from namespaced XML name (e.g., "adlcp:masteryscore" -> "masteryscore").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    let c = match entity {
        "apos" => '\'',
        "quot" => '"',
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST_1_2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="SCORM_f1" version="1.0"
  xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
  xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <metadata>
    <schema>ADL SCORM</schema>
    <schemaversion>1.2</schemaversion>
  </metadata>
  <organizations default="ORG-f1">
    <organization identifier="ORG-f1">
      <title>Q&amp;A &lt;Intro&gt;</title>
      <item identifier="ITEM-0" identifierref="RES-0">
        <title>Course</title>
        <adlcp:masteryscore>70</adlcp:masteryscore>
        <item identifier="ITEM-1" identifierref="RES-1">
          <title>L&apos;essentiel</title>
        </item>
      </item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="RES-0" type="webcontent" adlcp:scormtype="sco" href="index.html">
      <file href="index.html"/>
    </resource>
    <resource identifier="RES-1" type="webcontent" adlcp:scormtype="sco" href="module_1.html">
      <file href="module_1.html"/>
      <file href="styles.css"/>
    </resource>
  </resources>
</manifest>
"#;

    #[test]
    fn test_parse_1_2() {
        let m = parse_manifest(MANIFEST_1_2).unwrap();
        assert_eq!(m.identifier, "SCORM_f1");
        assert_eq!(m.version, Some(ScormVersion::V1_2));
        assert_eq!(m.title.as_deref(), Some("Q&A <Intro>"));
        assert_eq!(m.mastery_score, Some(70));
        assert_eq!(m.items.len(), 2);
        assert_eq!(m.items[0].depth, 0);
        assert_eq!(m.items[1].depth, 1);
        assert_eq!(m.items[1].title, "L'essentiel");
        assert_eq!(m.resources.len(), 2);
        assert_eq!(m.resources[1].files, ["module_1.html", "styles.css"]);
        assert_eq!(m.resources[0].scorm_type.as_deref(), Some("sco"));
        assert!(m.dangling_refs().is_empty());
        assert!(m.duplicate_identifiers().is_empty());
        assert!(m.check().is_ok());
    }

    #[test]
    fn test_dangling_and_duplicates() {
        let xml = MANIFEST_1_2
            .replace(r#"identifierref="RES-1""#, r#"identifierref="RES-9""#)
            .replace(r#"identifier="ITEM-1""#, r#"identifier="ITEM-0""#);
        let m = parse_manifest(&xml).unwrap();
        assert_eq!(m.dangling_refs(), ["RES-9"]);
        assert_eq!(m.duplicate_identifiers(), ["ITEM-0"]);
        assert!(matches!(m.check(), Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn test_version_from_namespace() {
        let xml = r#"<manifest identifier="x" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3"><resources/></manifest>"#;
        let m = parse_manifest(xml).unwrap();
        assert_eq!(m.version, Some(ScormVersion::V2004));
        assert!(m.schema_version.is_none());
    }

    #[test]
    fn test_rejects_wrong_root() {
        assert!(matches!(
            parse_manifest("<package/>"),
            Err(Error::InvalidManifest(_))
        ));
        assert!(matches!(parse_manifest(""), Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn test_rejects_forbidden_chars() {
        let xml = MANIFEST_1_2.replace("<title>Course</title>", "<title>Cou\u{B}rse</title>");
        assert!(matches!(parse_manifest(&xml), Err(Error::InvalidManifest(_))));
        let xml = MANIFEST_1_2.replace("L&apos;essentiel", "Intro\u{1}");
        assert!(matches!(parse_manifest(&xml), Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
        assert_eq!(resolve_entity("#233").as_deref(), Some("é"));
        assert_eq!(resolve_entity("#xE9").as_deref(), Some("é"));
        assert_eq!(resolve_entity("nbsp"), None);
    }

    #[test]
    fn test_inspect_rejects_non_zip() {
        assert!(inspect_package(b"not a zip").is_err());
    }
}
