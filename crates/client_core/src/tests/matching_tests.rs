use super::*;
use crate::fake_api::{dog, FakeApi};

fn favorites() -> SelectedDogs {
    [dog("a", "Pug"), dog("x", "Beagle"), dog("c", "Boxer")]
        .into_iter()
        .collect()
}

#[tokio::test]
async fn confirm_hydrates_the_matched_id() {
    let api = Arc::new(FakeApi::new(vec![dog("a", "Pug"), dog("x", "Beagle"), dog("c", "Boxer")]).with_match("x"));
    let mut flow = MatchFlow::new(api.clone(), favorites());

    let matched = flow.confirm().await.expect("match").clone();
    assert_eq!(matched.id, DogId::from("x"));
    assert_eq!(flow.overlay().map(|d| d.id.as_str()), Some("x"));

    assert_eq!(
        api.matches.lock().await.as_slice(),
        &[vec![DogId::from("a"), DogId::from("x"), DogId::from("c")]]
    );
    assert_eq!(
        api.hydrations.lock().await.as_slice(),
        &[vec![DogId::from("x")]]
    );
}

#[tokio::test]
async fn closing_the_overlay_returns_to_dashboard_and_keeps_selection() {
    let api = Arc::new(FakeApi::new(vec![dog("a", "Pug")]).with_match("a"));
    let mut flow = MatchFlow::new(api, [dog("a", "Pug")].into_iter().collect());

    flow.confirm().await.expect("match");
    assert_eq!(flow.close(), Navigation::Dashboard);
    assert!(flow.overlay().is_none());
    assert_eq!(flow.selection().len(), 1);
}

#[tokio::test]
async fn empty_selection_is_rejected_locally() {
    let api = Arc::new(FakeApi::new(Vec::new()));
    let mut flow = MatchFlow::new(api.clone(), SelectedDogs::new());

    let err = flow.confirm().await.expect_err("nothing selected");
    assert!(matches!(err, MatchError::NothingSelected));
    assert!(api.matches.lock().await.is_empty());
}

#[tokio::test]
async fn unknown_match_is_reported_as_missing() {
    let api = Arc::new(FakeApi::new(vec![dog("a", "Pug")]).with_match("ghost"));
    let mut flow = MatchFlow::new(api, [dog("a", "Pug")].into_iter().collect());

    let err = flow.confirm().await.expect_err("no such dog");
    assert!(matches!(err, MatchError::Missing(ref id) if id.as_str() == "ghost"));
    assert!(flow.overlay().is_none());
}
