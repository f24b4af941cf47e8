use crate::config::LoginConfig;
use url::form_urlencoded;

/// Assembles authorization-endpoint URLs for the configured tenant.
#[derive(Clone, Debug)]
pub struct LoginRedirector {
    config: LoginConfig,
}

impl LoginRedirector {
    pub fn new(config: LoginConfig) -> Self {
        Self { config }
    }

    /// Correlation value planted in the `authstate` cookie. The callback
    /// handler rejects provider responses whose `state` parameter does not
    /// match it. A fixed value from config, so concurrent initiations share
    /// it.
    pub fn state(&self) -> &str {
        &self.config.state
    }

    /// Builds the authorization URL. Parameter order is fixed; the
    /// `response_type` and `prompt` literals are emitted verbatim, every
    /// configured value goes through form encoding.
    pub fn authorize_url(&self, admin_consent: bool) -> String {
        let mut url = format!(
            "{}/oauth2/authorize?response_type=code&client_id={}&redirect_uri={}&state={}&resource={}",
            self.config.authority,
            form_encode(&self.config.client_id),
            form_encode(&self.config.redirect),
            form_encode(&self.config.state),
            form_encode(&self.config.resource),
        );

        if admin_consent {
            url.push_str("&prompt=admin_consent");
        }

        url
    }
}

// application/x-www-form-urlencoded: space becomes `+`, reserved bytes
// become %HH in UTF-8.
fn form_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
