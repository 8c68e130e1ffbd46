/// Identity of the running tool
///
/// Built once in `main` and handed to whatever needs to print or send it
/// (banner, user agent, final summary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub package: &'static str,
}

impl AppInfo {
    pub const NAME: &'static str = "moss";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub const fn current() -> Self {
        Self {
            name: Self::NAME,
            version: Self::VERSION,
            description: env!("CARGO_PKG_DESCRIPTION"),
            package: env!("CARGO_PKG_NAME"),
        }
    }

    /// ASCII banner shown at startup
    pub fn banner(&self) -> String {
        format!(
            r"
 __  __  ____   ____   _____
|  \/  |/ __ \ / __ \ / ____|
| \  / | |  | | |  | | (___
| |\/| | |  | | |  | |\___ \
| |  | | |__| | |__| |____) |
|_|  |_|\____/ \____/|_____/  v{}

    {}
",
            self.version, self.description
        )
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_contains_version() {
        let info = AppInfo::current();
        let banner = info.banner();
        assert!(banner.contains(&format!("v{}", info.version)));
        assert!(banner.contains(info.description));
    }

    #[test]
    fn test_version_matches_package() {
        assert_eq!(AppInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
