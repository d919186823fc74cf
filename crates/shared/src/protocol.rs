use serde::{Deserialize, Serialize};

use crate::domain::{DogId, SortDirection};

/// Fixed page size of the search endpoint.
pub const PAGE_SIZE: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub email: String,
}

/// Parameters of `GET /dogs/search`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub from: u32,
    pub size: u32,
    pub breeds: Vec<String>,
    pub sort: SortDirection,
}

impl SearchQuery {
    pub fn new(from: u32, breeds: Vec<String>, sort: SortDirection) -> Self {
        Self {
            from,
            size: PAGE_SIZE,
            breeds,
            sort,
        }
    }

    /// Query pairs in the order the service expects; one `breeds[]` pair per breed.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("from".to_string(), self.from.to_string()),
            ("size".to_string(), self.size.to_string()),
            ("sort".to_string(), self.sort.sort_param()),
        ];
        pairs.extend(
            self.breeds
                .iter()
                .map(|breed| ("breeds[]".to_string(), breed.clone())),
        );
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "resultIds")]
    pub result_ids: Vec<DogId>,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub matched: DogId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_repeat_breeds_after_paging() {
        let query = SearchQuery::new(48, vec!["Pug".into(), "Shih Tzu".into()], SortDirection::Desc);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("from".to_string(), "48".to_string()),
                ("size".to_string(), "24".to_string()),
                ("sort".to_string(), "breed:desc".to_string()),
                ("breeds[]".to_string(), "Pug".to_string()),
                ("breeds[]".to_string(), "Shih Tzu".to_string()),
            ]
        );
    }

    #[test]
    fn search_page_requires_result_ids() {
        let missing = serde_json::from_str::<SearchPage>(r#"{"total":3}"#);
        assert!(missing.is_err());

        let page: SearchPage =
            serde_json::from_str(r#"{"resultIds":["a","b"],"total":2,"next":"/dogs/search?from=24"}"#)
                .expect("decode page");
        assert_eq!(page.result_ids, vec![DogId::from("a"), DogId::from("b")]);
        assert!(page.prev.is_none());
    }

    #[test]
    fn match_response_reads_match_key() {
        let response: MatchResponse = serde_json::from_str(r#"{"match":"x"}"#).expect("decode");
        assert_eq!(response.matched, DogId::from("x"));
    }
}
