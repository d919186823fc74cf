use super::*;
use crate::fake_api::dog;

#[test]
fn select_then_deselect_leaves_selection_unchanged() {
    let mut selection: SelectedDogs = [dog("a", "Pug"), dog("b", "Beagle")].into_iter().collect();
    let before = selection.clone();

    assert!(selection.toggle(dog("c", "Boxer")));
    assert!(selection.contains(&DogId::from("c")));
    assert!(!selection.toggle(dog("c", "Boxer")));

    assert_eq!(selection, before);
}

#[test]
fn membership_is_by_id_not_by_value() {
    let mut selection = SelectedDogs::new();
    selection.toggle(dog("a", "Pug"));

    let mut renamed = dog("a", "Pug");
    renamed.name = "Renamed".to_string();
    assert!(!selection.toggle(renamed));
    assert!(selection.is_empty());
}

#[test]
fn navigation_url_round_trips_through_query_param() {
    let mut selection = SelectedDogs::new();
    selection.toggle(dog("a", "Shih Tzu"));
    selection.toggle(dog("b&c", "Pug"));

    let base = Url::parse("http://localhost/selected-dogs").expect("base url");
    let url = selection.navigation_url(&base).expect("serialize");
    assert!(url.as_str().contains("selectedDogs="));
    assert!(!url.as_str().contains('"'));

    let restored = SelectedDogs::from_url(&url).expect("parse");
    assert_eq!(restored, selection);
    assert_eq!(restored.ids(), vec![DogId::from("a"), DogId::from("b&c")]);
}

#[test]
fn missing_param_is_an_empty_selection() {
    let url = Url::parse("http://localhost/selected-dogs?other=1").expect("url");
    assert!(SelectedDogs::from_url(&url).expect("parse").is_empty());
}

#[test]
fn malformed_param_is_an_error() {
    let err = SelectedDogs::from_query_param("[{\"id\":1}]").expect_err("bad shape");
    assert!(err.to_string().starts_with("malformed selectedDogs parameter"));
}

#[test]
fn duplicate_ids_in_param_keep_first() {
    let raw = serde_json::to_string(&vec![dog("a", "Pug"), dog("a", "Beagle")]).expect("json");
    let selection = SelectedDogs::from_query_param(&raw).expect("parse");
    assert_eq!(selection.len(), 1);
    assert_eq!(selection.iter().next().map(|d| d.breed.as_str()), Some("Pug"));
}
