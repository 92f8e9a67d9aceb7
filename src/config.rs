/// Default host of the authentication API.
pub const DEFAULT_AUTH_HOSTNAME: &str = "api.dolby.io";
/// Default host of the communications (conferencing) API.
pub const DEFAULT_COMMUNICATIONS_HOSTNAME: &str = "comms.api.dolby.io";
/// Default host of the media processing API.
pub const DEFAULT_MEDIA_HOSTNAME: &str = "api.dolby.com";
/// Default host of the streaming API.
pub const DEFAULT_STREAMING_HOSTNAME: &str = "api.millicast.com";

/// Hosts used to build request URLs, one per platform.
///
/// A value may be a bare hostname (`api.dolby.com`, served over HTTPS) or a
/// full origin with a scheme (`http://127.0.0.1:8080`), which is used as-is.
///
/// ```
/// use dolbyio_rest::Hostnames;
///
/// let hosts = Hostnames::default().media("media.staging.example.com");
/// assert_eq!(hosts.media, "media.staging.example.com");
/// assert_eq!(hosts.streaming, "api.millicast.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostnames {
    pub auth: String,
    pub communications: String,
    pub media: String,
    pub streaming: String,
}

impl Hostnames {
    /// Use the same host for every platform. Mostly useful against a mock server.
    pub fn all(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            auth: host.clone(),
            communications: host.clone(),
            media: host.clone(),
            streaming: host,
        }
    }

    pub fn auth(mut self, host: impl Into<String>) -> Self {
        self.auth = host.into();
        self
    }

    pub fn communications(mut self, host: impl Into<String>) -> Self {
        self.communications = host.into();
        self
    }

    pub fn media(mut self, host: impl Into<String>) -> Self {
        self.media = host.into();
        self
    }

    pub fn streaming(mut self, host: impl Into<String>) -> Self {
        self.streaming = host.into();
        self
    }
}

impl Default for Hostnames {
    fn default() -> Self {
        Self {
            auth: DEFAULT_AUTH_HOSTNAME.to_string(),
            communications: DEFAULT_COMMUNICATIONS_HOSTNAME.to_string(),
            media: DEFAULT_MEDIA_HOSTNAME.to_string(),
            streaming: DEFAULT_STREAMING_HOSTNAME.to_string(),
        }
    }
}

/// Base URL for a configured host: bare hostnames get `https://`.
pub(crate) fn base_url(hostname: &str) -> String {
    let host = hostname.trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_hosts() {
        let hosts = Hostnames::default();
        assert_eq!(hosts.auth, "api.dolby.io");
        assert_eq!(hosts.communications, "comms.api.dolby.io");
        assert_eq!(hosts.media, "api.dolby.com");
        assert_eq!(hosts.streaming, "api.millicast.com");
    }

    #[test]
    fn setters_only_touch_their_platform() {
        let hosts = Hostnames::default().communications("comms.local");
        assert_eq!(hosts.communications, "comms.local");
        assert_eq!(hosts.media, DEFAULT_MEDIA_HOSTNAME);
    }

    #[test]
    fn all_uses_one_host() {
        let hosts = Hostnames::all("http://127.0.0.1:9000");
        assert_eq!(hosts.auth, hosts.streaming);
        assert_eq!(hosts.media, "http://127.0.0.1:9000");
    }

    #[test]
    fn base_url_adds_https_to_bare_hosts() {
        assert_eq!(base_url("api.dolby.com"), "https://api.dolby.com");
        assert_eq!(base_url("http://localhost:8080/"), "http://localhost:8080");
    }
}
