use super::*;

fn status(status: u16) -> ClientError {
    ClientError::Status {
        endpoint: "/dogs/search",
        status,
    }
}

#[test]
fn rejected_session_suggests_logging_in_again() {
    assert_eq!(reauth_hint(&anyhow::Error::from(status(401))), Some(REAUTH_HINT));
    assert_eq!(
        reauth_hint(&anyhow::Error::from(MatchError::Client(status(403)))),
        Some(REAUTH_HINT)
    );
}

#[test]
fn other_failures_carry_no_login_hint() {
    assert_eq!(reauth_hint(&anyhow::Error::from(status(500))), None);
    assert_eq!(
        reauth_hint(&anyhow::Error::from(ClientError::Network("connection refused".into()))),
        None
    );
    assert_eq!(reauth_hint(&anyhow!("none of the given ids matched a dog")), None);
    assert_eq!(
        reauth_hint(&anyhow::Error::from(MatchError::NothingSelected)),
        None
    );
}
