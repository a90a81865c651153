use std::io;

const NRDP_TOKEN: &str = "NRDP_TOKEN";

/// Receiver token from the environment, taking precedence over the configuration file
pub fn get_token_override() -> Option<String> {
    std::env::var(NRDP_TOKEN).ok().filter(|token| !token.is_empty())
}

const CONFIG_PATH: &str = "NRDP_REPORTER_CONFIG";

pub fn get_config_path() -> Option<String> {
    std::env::var(CONFIG_PATH).ok()
}

/// The configured host name, or the name of the local machine.
pub fn resolve_hostname(configured: Option<&str>) -> io::Result<String> {
    if let Some(hostname) = configured {
        return Ok(hostname.to_string());
    }

    hostname::get()?.into_string().map_err(|name| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("local host name is not valid UTF-8: {name:?}"),
        )
    })
}
