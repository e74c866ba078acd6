//! Child-process environment with the runtime version token swapped.
//!
//! The process environment is captured once. Each lint child gets its own
//! copy in which every `node/vX.Y.Z` segment (typically inside `PATH`) points
//! at the project's runtime release.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::sync::OnceLock;

use difflint_core::RuntimeVersion;
use regex::Regex;

fn runtime_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"node/v\d+\.\d+\.\d+").expect("valid runtime token regex"))
}

/// Snapshot of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<OsString, OsString>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Independent copy with runtime tokens rewritten for `version`.
    ///
    /// Values that are not valid UTF-8 are passed through untouched.
    pub fn patched_for(&self, version: RuntimeVersion) -> BTreeMap<OsString, OsString> {
        let replacement = format!("node/v{}", version.full_version());
        self.vars
            .iter()
            .map(|(key, value)| {
                let patched = match value.to_str() {
                    Some(text) => OsString::from(
                        runtime_token()
                            .replace_all(text, replacement.as_str())
                            .into_owned(),
                    ),
                    None => value.clone(),
                };
                (key.clone(), patched)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(map: &BTreeMap<OsString, OsString>) -> String {
        map.get(&OsString::from("PATH"))
            .unwrap()
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_patch_rewrites_every_runtime_segment() {
        let env = EnvSnapshot::from_pairs([
            (
                "PATH",
                "/home/ci/.nvm/versions/node/v6.9.0/bin:/usr/bin:/opt/node/v10.1.2/bin",
            ),
            ("HOME", "/home/ci"),
        ]);

        let v8 = env.patched_for(RuntimeVersion::V8);
        assert_eq!(
            path_of(&v8),
            "/home/ci/.nvm/versions/node/v8.11.1/bin:/usr/bin:/opt/node/v8.11.1/bin"
        );
        assert_eq!(v8.get(&OsString::from("HOME")).unwrap(), "/home/ci");

        let v4 = env.patched_for(RuntimeVersion::V4);
        assert!(path_of(&v4).contains("node/v4.3.1/bin"));
    }

    #[test]
    fn test_patch_leaves_snapshot_untouched() {
        let env = EnvSnapshot::from_pairs([("PATH", "/x/node/v6.0.0/bin")]);
        let _ = env.patched_for(RuntimeVersion::V8);
        let again = env.patched_for(RuntimeVersion::V4);
        assert_eq!(path_of(&again), "/x/node/v4.3.1/bin");
    }

    #[test]
    fn test_patch_ignores_partial_tokens() {
        let env = EnvSnapshot::from_pairs([("NODE_HINT", "node/v8 and node/v1.2")]);
        let patched = env.patched_for(RuntimeVersion::V8);
        assert_eq!(
            patched.get(&OsString::from("NODE_HINT")).unwrap(),
            "node/v8 and node/v1.2"
        );
    }

    #[test]
    fn test_capture_reads_process_env() {
        let env = EnvSnapshot::capture();
        let patched = env.patched_for(RuntimeVersion::V4);
        assert_eq!(patched.len(), std::env::vars_os().count());
    }
}
