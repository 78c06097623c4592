//! Device XML templates.
//!
//! A template is a `<name>.xml` file in the devices directory. Tokens of the
//! form `$UPPERCASE_NAME` are replaced with query parameter values before the
//! XML is handed to the hypervisor. Replacement is plain text: values are not
//! escaped and leftover tokens are not reported.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the templates directory next to the entry point.
pub const DEVICES_DIR_NAME: &str = "devices";

/// Template file extension.
const TEMPLATE_EXTENSION: &str = "xml";

/// Directory of device XML templates.
#[derive(Debug, Clone)]
pub struct DeviceTemplates {
    dir: PathBuf,
}

impl DeviceTemplates {
    /// Use templates from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Locate the `devices/` directory adjacent to the entry point.
    ///
    /// Development builds look inside the crate directory first so that
    /// `cargo run` picks up the checked-in templates, then next to the
    /// executable. Release builds use the opposite order. The first existing
    /// candidate wins; when none exists the preferred one is returned.
    pub fn locate() -> Result<Self> {
        let source = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEVICES_DIR_NAME);
        let installed = executable_dir()?.join(DEVICES_DIR_NAME);

        let candidates = if cfg!(debug_assertions) {
            [source, installed]
        } else {
            [installed, source]
        };
        Ok(Self::new(pick_existing(candidates)))
    }

    /// Templates directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the template called `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION))
    }

    /// Read the template called `name`.
    ///
    /// Names that are not a single plain file name (`a/b`, `..`, `a\b`)
    /// never leave the templates directory and report as not found.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        if !is_plain_name(name) {
            return Err(Error::TemplateNotFound { path });
        }
        match std::fs::read_to_string(&path) {
            Ok(xml) => Ok(xml),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::TemplateNotFound { path }),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && matches!(
            Path::new(name).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        )
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::config(format!("executable has no parent: {}", exe.display())))
}

fn pick_existing(candidates: [PathBuf; 2]) -> PathBuf {
    let [preferred, fallback] = candidates;
    if !preferred.is_dir() && fallback.is_dir() {
        fallback
    } else {
        preferred
    }
}

/// Substitute query parameters into a template.
///
/// Each `key=value` replaces every `$KEY` (key upper-cased). Keys are applied
/// in the order they first appear; a repeated key keeps its last value.
pub fn render<K, V>(template: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut merged: Vec<(&str, &str)> = Vec::with_capacity(params.len());
    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => merged.push((key, value)),
        }
    }

    merged
        .into_iter()
        .fold(template.to_string(), |xml, (key, value)| {
            xml.replace(&format!("${}", key.to_uppercase()), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTDEV: &str = "<hostdev mode='subsystem' type='usb'>\
<source><vendor id='$VENDOR'/><product id='$PRODUCT'/></source></hostdev>";

    #[test]
    fn test_render_replaces_uppercased_keys() {
        let xml = render(HOSTDEV, &[("vendor", "0x046d"), ("product", "0xc52b")]);
        assert_eq!(
            xml,
            "<hostdev mode='subsystem' type='usb'>\
<source><vendor id='0x046d'/><product id='0xc52b'/></source></hostdev>"
        );
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        assert_eq!(render("$NAME-$NAME", &[("name", "foo")]), "foo-foo");
    }

    #[test]
    fn test_render_keys_are_case_insensitive() {
        for key in ["name", "Name", "NAME", "nAmE"] {
            assert_eq!(render("<a n='$NAME'/>", &[(key, "foo")]), "<a n='foo'/>", "key {}", key);
        }
    }

    #[test]
    fn test_render_leaves_unmatched_tokens() {
        let xml = render(HOSTDEV, &[("vendor", "0x046d"), ("unused", "x")]);
        assert!(xml.contains("0x046d"));
        assert!(xml.contains("$PRODUCT"));
    }

    #[test]
    fn test_render_does_not_escape() {
        assert_eq!(render("<a b='$V'/>", &[("v", "x'/><evil/>")]), "<a b='x'/><evil/>'/>");
    }

    #[test]
    fn test_render_follows_parameter_order() {
        // The first replacement introduces a token the second one consumes.
        assert_eq!(render("$A", &[("a", "$B"), ("b", "done")]), "done");
        assert_eq!(render("$A", &[("b", "done"), ("a", "$B")]), "$B");
    }

    #[test]
    fn test_render_repeated_key_keeps_last_value() {
        assert_eq!(render("$BUS", &[("bus", "1"), ("bus", "2")]), "2");
    }

    #[test]
    fn test_load_reads_named_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("usb.xml"), HOSTDEV).unwrap();

        let templates = DeviceTemplates::new(dir.path());
        assert_eq!(templates.load("usb").unwrap(), HOSTDEV);
    }

    #[test]
    fn test_load_missing_template_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let templates = DeviceTemplates::new(dir.path());

        let err = templates.load("nope").unwrap_err();
        let expected = dir.path().join("nope.xml");
        match &err {
            Error::TemplateNotFound { path } => assert_eq!(path, &expected),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(&expected.display().to_string()));
    }

    #[test]
    fn test_load_rejects_names_outside_directory() {
        let root = tempfile::tempdir().unwrap();
        let devices = root.path().join(DEVICES_DIR_NAME);
        std::fs::create_dir(&devices).unwrap();
        std::fs::create_dir(devices.join("sub")).unwrap();
        std::fs::write(root.path().join("secret.xml"), "TOP-SECRET").unwrap();
        std::fs::write(devices.join("sub").join("nested.xml"), "<nested/>").unwrap();

        let templates = DeviceTemplates::new(&devices);
        for name in ["../secret", "..\\secret", "sub/nested", "..", "/etc/passwd", ""] {
            match templates.load(name) {
                Err(Error::TemplateNotFound { path }) => {
                    assert_eq!(path, templates.path_for(name), "name {:?}", name)
                }
                other => panic!("name {:?}: unexpected {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_pick_existing_prefers_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().to_path_buf();
        let missing = dir.path().join("missing");

        assert_eq!(pick_existing([present.clone(), missing.clone()]), present);
        assert_eq!(pick_existing([missing.clone(), present.clone()]), present);
        assert_eq!(
            pick_existing([missing.clone(), dir.path().join("other")]),
            missing
        );
    }

    #[test]
    fn test_locate_uses_devices_dir_name() {
        let templates = DeviceTemplates::locate().unwrap();
        assert!(templates.dir().ends_with(DEVICES_DIR_NAME));
    }
}
