use super::*;

fn breeds() -> BreedFilter {
    BreedFilter::new(vec![
        "Beagle".to_string(),
        "Bernese Mountain Dog".to_string(),
        "Miniature Pinscher".to_string(),
        "Pug".to_string(),
    ])
}

#[test]
fn toggling_a_breed_twice_restores_the_filter_set() {
    let start = SearchFormState::default()
        .toggle_breed("Pug")
        .with_search("be");
    let once = start.toggle_breed("Beagle");
    assert_eq!(once.breeds(), &["Pug".to_string(), "Beagle".to_string()]);

    let twice = once.toggle_breed("Beagle");
    assert_eq!(twice.breeds(), start.breeds());
    assert_eq!(twice.fetch_key(), start.fetch_key());
}

#[test]
fn toggling_a_breed_clears_the_text_query() {
    let state = SearchFormState::default().with_search("pin");
    let next = state.toggle_breed("Miniature Pinscher");
    assert_eq!(next.search(), "");
    assert_eq!(state.search(), "pin");
}

#[test]
fn text_query_does_not_change_fetch_key() {
    let state = SearchFormState::default();
    assert_eq!(state.with_search("pug").fetch_key(), state.fetch_key());
    assert_ne!(state.with_sort(SortDirection::Desc).fetch_key(), state.fetch_key());
    assert_ne!(state.with_offset(24).fetch_key(), state.fetch_key());
}

#[test]
fn fetch_key_treats_breeds_as_a_set() {
    let ab = SearchFormState::default().toggle_breed("A").toggle_breed("B");
    let ba = SearchFormState::default().toggle_breed("B").toggle_breed("A");
    assert_eq!(ab.fetch_key(), ba.fetch_key());
    assert_ne!(ab.breeds(), ba.breeds());
}

#[test]
fn query_carries_offset_sort_and_breeds() {
    let state = SearchFormState::default()
        .with_offset(72)
        .with_sort(SortDirection::Desc)
        .toggle_breed("Pug");
    let query = state.query();
    assert_eq!(query.from, 72);
    assert_eq!(query.size, 24);
    assert_eq!(query.sort, SortDirection::Desc);
    assert_eq!(query.breeds, vec!["Pug".to_string()]);
}

#[test]
fn breed_matching_is_case_insensitive_substring() {
    let filter = breeds();
    assert_eq!(filter.matching("BE"), vec!["Beagle", "Bernese Mountain Dog"]);
    assert_eq!(filter.matching("pin"), vec!["Miniature Pinscher"]);
    assert!(filter.matching("husky").is_empty());
    assert_eq!(filter.matching("").len(), 4);
}
