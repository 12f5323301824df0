//! Network interface link state.
//!
//! On Linux the administrative `IFF_UP` bit is read from
//! `/sys/class/net/<iface>/flags`. Elsewhere, or when that file cannot be
//! read, an interface counts as up when it has an address assigned.

use std::path::Path;

/// `IFF_UP` from `<net/if.h>`.
const IFF_UP: u32 = 0x1;

/// Root of the Linux per-interface sysfs tree.
pub const SYSFS_NET_ROOT: &str = "/sys/class/net";

/// Parse the contents of a sysfs `flags` file (e.g. `0x1003\n`).
pub fn parse_if_flags(contents: &str) -> Option<u32> {
    let trimmed = contents.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(hex, 16).ok()
}

/// Read the `IFF_UP` bit for `name` below `sysfs_root`, if available.
pub fn read_if_up(sysfs_root: &Path, name: &str) -> Option<bool> {
    let contents = std::fs::read_to_string(sysfs_root.join(name).join("flags")).ok()?;
    parse_if_flags(&contents).map(|flags| flags & IFF_UP != 0)
}

/// Decide whether an interface is up.
///
/// `has_addresses` is the fallback used when the kernel flags are not
/// readable.
pub fn interface_is_up(name: &str, has_addresses: bool) -> bool {
    if cfg!(target_os = "linux") {
        if let Some(up) = read_if_up(Path::new(SYSFS_NET_ROOT), name) {
            return up;
        }
    }
    has_addresses
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_if_flags() {
        assert_eq!(parse_if_flags("0x1003\n"), Some(0x1003));
        assert_eq!(parse_if_flags("0x1002"), Some(0x1002));
        assert_eq!(parse_if_flags("garbage"), None);
    }

    #[test]
    fn test_read_if_up_from_fake_sysfs() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("eth0")).unwrap();
        std::fs::create_dir_all(root.path().join("eth1")).unwrap();
        std::fs::write(root.path().join("eth0").join("flags"), "0x1003\n").unwrap();
        std::fs::write(root.path().join("eth1").join("flags"), "0x1002\n").unwrap();

        assert_eq!(read_if_up(root.path(), "eth0"), Some(true));
        assert_eq!(read_if_up(root.path(), "eth1"), Some(false));
        assert_eq!(read_if_up(root.path(), "wlan0"), None);
    }

    #[test]
    fn test_interface_is_up_falls_back_to_addresses() {
        // No such interface in sysfs, so the address fallback decides.
        assert!(interface_is_up("netmon-test-missing0", true));
        assert!(!interface_is_up("netmon-test-missing0", false));
    }
}
