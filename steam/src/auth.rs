use crate::endpoint::Endpoint;
use crate::{Error, Result};
use serde::Deserialize;

/// An authenticated session: the opaque login token plus the `sessionid`
/// value the market endpoints expect echoed back in purchase forms.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub session_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            session_id: session_id.into(),
        }
    }

    pub(crate) fn cookie(&self) -> String {
        format!("sessionid={}; steamLoginSecure={}", self.session_id, self.token)
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    requires_twofactor: bool,
    message: Option<String>,
    token: Option<String>,
    session_id: Option<String>,
}

/// Performs the login handshake. A rejected login or a missing second factor
/// is fatal for the run; there is no point polling without a session.
pub async fn login(
    base_url: &str,
    username: &str,
    password: &str,
    guard_code: Option<&str>,
) -> Result<Session> {
    let client = reqwest::Client::new();

    let mut form = vec![
        ("username".to_string(), username.to_string()),
        ("password".to_string(), password.to_string()),
    ];
    if let Some(code) = guard_code {
        form.push(("twofactorcode".to_string(), code.to_string()));
    }

    let response = client
        .post(format!("{base_url}{}", Endpoint::Login))
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status, response.text().await?));
    }

    let text = response.text().await?;
    let body: LoginResponse = serde_json::from_str(&text).map_err(|_| Error::Deserialize(text))?;

    if body.requires_twofactor && guard_code.is_none() {
        return Err(Error::Auth("second factor required".to_string()));
    }

    if !body.success {
        return Err(Error::Auth(
            body.message.unwrap_or_else(|| "login rejected".to_string()),
        ));
    }

    match (body.token, body.session_id) {
        (Some(token), Some(session_id)) => Ok(Session::new(token, session_id)),
        _ => Err(Error::Auth(
            "login response carried no session token".to_string(),
        )),
    }
}
