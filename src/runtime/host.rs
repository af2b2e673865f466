//! Host channels: how a session reaches the LMS runtime API.

use std::collections::BTreeMap;

use crate::model::ScormVersion;

use super::vocabulary::CmiVocabulary;

/// A connection to an LMS runtime API.
///
/// `send` invokes a native method (`LMSInitialize`, `SetValue`, ...) with
/// string arguments. `None` means no host API is reachable; sessions treat
/// that as a silent no-op, never as an error.
pub trait HostChannel {
    fn send(&mut self, call: &str, args: &[&str]) -> Option<String>;
}

impl<H: HostChannel + ?Sized> HostChannel for &mut H {
    fn send(&mut self, call: &str, args: &[&str]) -> Option<String> {
        (**self).send(call, args)
    }
}

impl<H: HostChannel + ?Sized> HostChannel for Box<H> {
    fn send(&mut self, call: &str, args: &[&str]) -> Option<String> {
        (**self).send(call, args)
    }
}

/// Channel for content running outside any LMS.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostChannel for NullHost {
    fn send(&mut self, _call: &str, _args: &[&str]) -> Option<String> {
        None
    }
}

/// In-memory LMS runtime that stores CMI values and records every call.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    vocab: &'static CmiVocabulary,
    values: BTreeMap<String, String>,
    calls: Vec<String>,
    commits: usize,
    active: bool,
}

impl MemoryHost {
    pub fn new(version: ScormVersion) -> Self {
        Self {
            vocab: CmiVocabulary::for_version(version),
            values: BTreeMap::new(),
            calls: Vec::new(),
            commits: 0,
            active: false,
        }
    }

    /// Builder: seed a CMI value, as an LMS would for a resumed attempt.
    pub fn with_value(mut self, element: &str, value: &str) -> Self {
        self.values.insert(element.to_string(), value.to_string());
        self
    }

    pub fn value(&self, element: &str) -> Option<&str> {
        self.values.get(element).map(String::as_str)
    }

    /// Native method names in call order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// True between a successful initialize and terminate.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl HostChannel for MemoryHost {
    fn send(&mut self, call: &str, args: &[&str]) -> Option<String> {
        self.calls.push(call.to_string());
        let vocab = self.vocab;
        let ok = |b: bool| Some(if b { "true" } else { "false" }.to_string());

        if call == vocab.initialize {
            let fresh = !self.active;
            self.active = true;
            ok(fresh)
        } else if call == vocab.terminate {
            let was_active = self.active;
            self.active = false;
            ok(was_active)
        } else if call == vocab.get_value {
            let element = args.first().copied().unwrap_or_default();
            Some(self.values.get(element).cloned().unwrap_or_default())
        } else if call == vocab.set_value {
            match (self.active, args) {
                (true, [element, value, ..]) => {
                    self.values.insert(element.to_string(), value.to_string());
                    ok(true)
                }
                _ => ok(false),
            }
        } else if call == vocab.commit {
            if self.active {
                self.commits += 1;
            }
            ok(self.active)
        } else {
            ok(false)
        }
    }
}
