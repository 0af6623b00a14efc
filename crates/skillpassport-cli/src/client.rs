// HTTP client for the Skill Passport API
//
// Every request carries the acting user in X-User-Id. Writes fetch the
// caller's sesskey first and echo it in X-Sesskey.

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use skillpassport_chain::CredentialKind;

const USER_ID_HEADER: &str = "X-User-Id";
const SESSKEY_HEADER: &str = "X-Sesskey";

/// Client acting as one user against one server.
pub struct PassportClient {
    base_url: String,
    user_id: i64,
}

impl PassportClient {
    pub fn new(base_url: &str, user_id: i64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        }
    }

    /// Full URL of an API path such as `/credentials`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub fn sesskey(&self) -> Result<String> {
        let body = self.get("/session/sesskey")?;
        body["sesskey"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Server returned no sesskey"))
    }

    pub fn issue(&self, form: &Value) -> Result<Value> {
        let sesskey = self.sesskey()?;
        let request = self.request("POST", "/credentials").set(SESSKEY_HEADER, &sesskey);
        finish(request.send_json(form.clone()))
    }

    pub fn mint(&self, credential_id: i64) -> Result<Value> {
        let sesskey = self.sesskey()?;
        let path = format!("/credentials/{}/nft", credential_id);
        finish(self.request("POST", &path).set(SESSKEY_HEADER, &sesskey).call())
    }

    pub fn passport(&self, user_id: Option<i64>) -> Result<Value> {
        match user_id {
            Some(id) => self.get(&format!("/passport?userid={}", id)),
            None => self.get("/passport"),
        }
    }

    pub fn nft(&self, nft_id: i64) -> Result<Value> {
        self.get(&format!("/nfts/{}", nft_id))
    }

    pub fn export(&self, user_id: i64) -> Result<Value> {
        self.get(&format!("/privacy/users/{}?scope=system", user_id))
    }

    pub fn erase(&self, user_id: i64) -> Result<Value> {
        let sesskey = self.sesskey()?;
        let path = format!("/privacy/users/{}?scope=system", user_id);
        finish(self.request("DELETE", &path).set(SESSKEY_HEADER, &sesskey).call())
    }

    fn get(&self, path: &str) -> Result<Value> {
        finish(self.request("GET", path).call())
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        ureq::request(method, &self.url(path)).set(USER_ID_HEADER, &self.user_id.to_string())
    }
}

/// Builds the issue-form body, putting the item id in the field the kind expects.
pub fn issue_form(user_id: i64, kind: CredentialKind, item_id: i64, hash: Option<&str>) -> Value {
    let mut form = Map::new();
    form.insert("userid".to_string(), Value::from(user_id));
    form.insert("credentialtype".to_string(), Value::from(kind.as_str()));
    form.insert(kind.item_field().to_string(), Value::from(item_id));
    if let Some(hash) = hash {
        form.insert("blockchain_txhash".to_string(), Value::from(hash));
    }
    Value::Object(form)
}

/// Message carried in an `{"error": ...}` body, if any.
pub fn error_message(body: &Value) -> Option<&str> {
    body.get("error").and_then(Value::as_str)
}

fn finish(result: std::result::Result<ureq::Response, ureq::Error>) -> Result<Value> {
    match result {
        Ok(response) => response
            .into_json()
            .context("Failed to parse server response"),
        Err(ureq::Error::Status(code, response)) => {
            let body: Value = response.into_json().unwrap_or(Value::Null);
            match error_message(&body) {
                Some(message) => Err(anyhow!("{} (HTTP {})", message, code)),
                None => Err(anyhow!("Request failed with HTTP {}", code)),
            }
        }
        Err(e) => Err(anyhow!("Failed to reach server: {}", e)),
    }
}
