//! Authorization request bindings
//!
//! Builds the provider-bound request that starts a conversation. Both
//! bindings carry the same ordered field set:
//!
//! `client_id, redirect_uri, [state], nonce, response_type=code, scope,
//! code_challenge, code_challenge_method=S256`
//!
//! The redirect binding percent-encodes them into the authorize URL's query
//! string; the post binding emits them as hidden form fields, followed by an
//! optional JSON `extensions` field.

use authkit_domain::constants::CODE_CHALLENGE_METHOD;
use serde_json::Value;

use super::ports::FormPost;

/// Everything needed to express one authorization request.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizeRequest<'a> {
    pub endpoint: &'a str,
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub state: Option<&'a str>,
    pub nonce: &'a str,
    pub scope: &'a [String],
    pub code_challenge: &'a str,
    pub extensions: Option<&'a Value>,
}

impl AuthorizeRequest<'_> {
    /// Ordered `(name, value)` pairs shared by every binding.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(8);
        fields.push(("client_id", self.client_id.to_string()));
        fields.push(("redirect_uri", self.redirect_uri.to_string()));
        if let Some(state) = self.state {
            fields.push(("state", state.to_string()));
        }
        fields.push(("nonce", self.nonce.to_string()));
        fields.push(("response_type", "code".to_string()));
        fields.push(("scope", self.scope.join(" ")));
        fields.push(("code_challenge", self.code_challenge.to_string()));
        fields.push(("code_challenge_method", CODE_CHALLENGE_METHOD.to_string()));
        fields
    }

    /// Authorize URL for the redirect binding.
    #[must_use]
    pub fn redirect_url(&self) -> String {
        let query = encode_query(&self.fields());
        format!("{}?{query}", self.endpoint)
    }

    /// Authorize URL for a silent attempt: no prompt, result posted back as
    /// a web message.
    #[must_use]
    pub fn silent_url(&self) -> String {
        let mut fields = self.fields();
        fields.push(("prompt", "none".to_string()));
        fields.push(("response_mode", "web_message".to_string()));
        format!("{}?{}", self.endpoint, encode_query(&fields))
    }

    /// Form descriptor for the post binding.
    #[must_use]
    pub fn form_post(&self) -> FormPost {
        let mut fields: Vec<(String, String)> =
            self.fields().into_iter().map(|(name, value)| (name.to_string(), value)).collect();
        if let Some(extensions) = self.extensions {
            fields.push(("extensions".to_string(), extensions.to_string()));
        }
        FormPost { action: self.endpoint.to_string(), fields }
    }
}

fn encode_query(fields: &[(&'static str, String)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::binding.
    use serde_json::json;

    use super::*;

    fn scope() -> Vec<String> {
        vec!["openid".to_string(), "profile".to_string()]
    }

    fn request<'a>(scope: &'a [String], state: Option<&'a str>) -> AuthorizeRequest<'a> {
        AuthorizeRequest {
            endpoint: "https://issuer.example/authorize",
            client_id: "cid",
            redirect_uri: "https://app.example/callback",
            state,
            nonce: "N0nce",
            scope,
            code_challenge: "CHAL",
            extensions: None,
        }
    }

    /// Validates `AuthorizeRequest::redirect_url` behavior for the exact
    /// query string scenario.
    ///
    /// Assertions:
    /// - Confirms field order and percent-encoding match the wire contract.
    #[test]
    fn test_redirect_url_exact() {
        let scope = scope();
        let url = request(&scope, None).redirect_url();

        assert_eq!(
            url,
            "https://issuer.example/authorize?client_id=cid\
             &redirect_uri=https%3A%2F%2Fapp.example%2Fcallback\
             &nonce=N0nce&response_type=code&scope=openid%20profile\
             &code_challenge=CHAL&code_challenge_method=S256"
        );
    }

    /// Validates `AuthorizeRequest::redirect_url` behavior for the state
    /// parameter scenario.
    ///
    /// Assertions:
    /// - Confirms `state` is placed between `redirect_uri` and `nonce`.
    #[test]
    fn test_redirect_url_with_state() {
        let scope = scope();
        let url = request(&scope, Some("a b")).redirect_url();

        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fapp.example%2Fcallback&state=a%20b&nonce=N0nce"
        ));
    }

    /// Validates `AuthorizeRequest::form_post` behavior for the extensions
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the form targets the authorize endpoint.
    /// - Confirms fields are unencoded, ordered, and end with `extensions`.
    #[test]
    fn test_form_post_fields_and_extensions() {
        let scope = scope();
        let extensions = json!({"acr": "mfa"});
        let mut req = request(&scope, Some("S"));
        req.extensions = Some(&extensions);

        let form = req.form_post();
        let names: Vec<&str> = form.fields.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(form.action, "https://issuer.example/authorize");
        assert_eq!(
            names,
            vec![
                "client_id",
                "redirect_uri",
                "state",
                "nonce",
                "response_type",
                "scope",
                "code_challenge",
                "code_challenge_method",
                "extensions",
            ]
        );
        assert_eq!(form.fields[1].1, "https://app.example/callback");
        assert_eq!(form.fields[5].1, "openid profile");
        assert_eq!(form.fields[8].1, r#"{"acr":"mfa"}"#);
    }

    #[test]
    fn test_form_post_without_extensions() {
        let scope = scope();
        let form = request(&scope, None).form_post();
        assert_eq!(form.fields.len(), 7);
        assert!(form.fields.iter().all(|(name, _)| name != "extensions"));
    }

    #[test]
    fn test_silent_url_appends_prompt_and_mode() {
        let scope = scope();
        let url = request(&scope, None).silent_url();
        assert!(url.ends_with("&code_challenge_method=S256&prompt=none&response_mode=web_message"));
    }
}
