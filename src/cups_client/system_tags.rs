use std::collections::HashMap;
#[cfg(unix)]
use std::ffi::CStr;

use snafu::ResultExt;

use super::error::{CupsError, SystemTagsSnafu};

/// Host and build facts attached to every printer's tags. Collected once at
/// startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemTags(HashMap<String, String>);

impl SystemTags {
    pub fn collect() -> Result<Self, CupsError> {
        let mut tags = HashMap::new();

        tags.insert("connector-version".to_string(), env!("CARGO_PKG_VERSION").to_string());
        tags.insert("system-arch".to_string(), std::env::consts::ARCH.to_string());

        let uname = uname().context(SystemTagsSnafu)?;
        tags.insert("system-hostname".to_string(), uname.nodename.clone());
        tags.insert("system-uname-sysname".to_string(), uname.sysname);
        tags.insert("system-uname-nodename".to_string(), uname.nodename);
        tags.insert("system-uname-release".to_string(), uname.release);
        tags.insert("system-uname-version".to_string(), uname.version);
        tags.insert("system-uname-machine".to_string(), uname.machine);

        tags.insert("connector-cups-client-version".to_string(), IPP_CLIENT_VERSION.to_string());

        Ok(SystemTags(tags))
    }

    pub fn from_map(tags: HashMap<String, String>) -> Self {
        SystemTags(tags)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Version line of the IPP client library this connector speaks through.
const IPP_CLIENT_VERSION: &str = "ipp.rs 5";

struct Uname {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
}

#[cfg(unix)]
fn uname() -> std::io::Result<Uname> {
    let mut name: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut name) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(Uname {
        sysname: field(&name.sysname),
        nodename: field(&name.nodename),
        release: field(&name.release),
        version: field(&name.version),
        machine: field(&name.machine),
    })
}

#[cfg(unix)]
fn field(f: &[libc::c_char]) -> String {
    // uname fields are always NUL terminated.
    unsafe { CStr::from_ptr(f.as_ptr()) }.to_string_lossy().into_owned()
}

#[cfg(not(unix))]
fn uname() -> std::io::Result<Uname> {
    Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "uname is only available on unix"))
}
