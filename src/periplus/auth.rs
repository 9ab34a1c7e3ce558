use crate::browser::{CDPClient, Locator};
use crate::error::{fail, FailOnTimeout, Result};
use crate::periplus::{
    email_field, login_button, login_warning, logout_notice, logout_titles, password_field,
    search_bar, LOGIN_BUTTON_ID, LOGIN_PATH, LOGOUT_PATH,
};
use crate::session::{AuthState, Session};

pub const LOGOUT_CONFIRMATION: &str = "You have been logged off your account.";
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// A marker element whose presence explains why an expected page never appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureProbe {
    pub marker: Locator,
    pub reason: &'static str,
}

impl FailureProbe {
    pub fn new(marker: Locator, reason: &'static str) -> Self {
        Self { marker, reason }
    }
}

/// Probes checked, in order, when the post-login page does not show up.
pub fn login_failure_probes() -> Vec<FailureProbe> {
    vec![FailureProbe::new(login_warning(), "Invalid Credentials")]
}

/// Reason of the first probe reported present, or `fallback`.
pub fn first_reason(
    probes: &[FailureProbe],
    present: &[bool],
    fallback: &'static str,
) -> &'static str {
    probes
        .iter()
        .zip(present)
        .find(|(_, present)| **present)
        .map(|(probe, _)| probe.reason)
        .unwrap_or(fallback)
}

/// Evaluate `probes` against the current page.
pub async fn diagnose(
    client: &CDPClient,
    probes: &[FailureProbe],
    fallback: &'static str,
) -> Result<&'static str> {
    let mut present = Vec::with_capacity(probes.len());
    for probe in probes {
        let hit = client.count(None, &probe.marker).await? > 0;
        present.push(hit);
        if hit {
            break;
        }
    }
    Ok(first_reason(probes, &present, fallback))
}

/// Log in with the session's credentials.
pub async fn login(session: &mut Session) -> Result<()> {
    let client = session.client();
    let wait = session.wait();

    client.navigate(&session.url(LOGIN_PATH)).await?;
    wait.until_visible(client, &login_button())
        .await
        .fail_on_timeout(|| {
            format!(
                "Login failed: Can't find login button element with id '{}'",
                LOGIN_BUTTON_ID
            )
        })?;

    let credentials = session.credentials();
    let email = client.find(None, &email_field()).await?;
    client.send_keys(&email, &credentials.username).await?;
    let password = client.find(None, &password_field()).await?;
    client.send_keys(&password, &credentials.password).await?;
    let button = client.find(None, &login_button()).await?;
    client.click(&button).await?;

    match wait.until_visible(client, &search_bar()).await {
        Ok(_) => {}
        Err(e) if e.is_timeout() => {
            let reason = diagnose(client, &login_failure_probes(), UNKNOWN_ERROR).await?;
            tracing::warn!("Login as {:?} failed: {}", credentials.username, reason);
            return fail(format!("Login failed: {}", reason));
        }
        Err(e) => return Err(e),
    }

    tracing::info!("Logged in as {:?}", credentials.username);
    session.set_auth_state(AuthState::Authenticated);
    Ok(())
}

/// Log out and check the confirmation banner.
pub async fn logout(session: &mut Session) -> Result<()> {
    let client = session.client();
    let wait = session.wait();
    let unknown = || format!("Logout failed: {}", UNKNOWN_ERROR);

    client.navigate(&session.url(LOGOUT_PATH)).await?;
    for title in logout_titles() {
        wait.until_visible(client, &title)
            .await
            .fail_on_timeout(unknown)?;
    }

    let notice = match client.find(None, &logout_notice()).await {
        Ok(notice) => client.text(&notice).await?,
        Err(_) => return fail(unknown()),
    };
    if !notice.contains(LOGOUT_CONFIRMATION) {
        return fail(format!(
            "Logout failed: expected '{}' but the page said '{}'",
            LOGOUT_CONFIRMATION,
            notice.trim()
        ));
    }

    tracing::info!("Logged out");
    session.set_auth_state(AuthState::Anonymous);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_probes_start_with_warning_marker() {
        let probes = login_failure_probes();
        assert_eq!(probes[0].marker, Locator::id("warning"));
        assert_eq!(probes[0].reason, "Invalid Credentials");
    }

    #[test]
    fn test_first_reason_respects_order() {
        let probes = vec![
            FailureProbe::new(Locator::id("warning"), "Invalid Credentials"),
            FailureProbe::new(Locator::class_name("captcha"), "Captcha Required"),
        ];
        assert_eq!(first_reason(&probes, &[true, true], UNKNOWN_ERROR), "Invalid Credentials");
        assert_eq!(first_reason(&probes, &[false, true], UNKNOWN_ERROR), "Captcha Required");
        assert_eq!(first_reason(&probes, &[false, false], UNKNOWN_ERROR), UNKNOWN_ERROR);
    }

    #[test]
    fn test_first_reason_with_short_circuited_probes() {
        let probes = login_failure_probes();
        assert_eq!(first_reason(&probes, &[], UNKNOWN_ERROR), UNKNOWN_ERROR);
    }

    #[test]
    fn test_reason_outlives_probe_list() {
        let reason = first_reason(&login_failure_probes(), &[true], UNKNOWN_ERROR);
        let fallback = first_reason(&login_failure_probes(), &[false], UNKNOWN_ERROR);
        assert_eq!(format!("Login failed: {}", reason), "Login failed: Invalid Credentials");
        assert_eq!(format!("Login failed: {}", fallback), "Login failed: Unknown Error");
    }
}
