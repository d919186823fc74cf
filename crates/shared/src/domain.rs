use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(DogId);

/// A shelter dog as returned by `POST /dogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: DogId,
    pub img: String,
    pub name: String,
    pub age: u32,
    pub zip_code: String,
    pub breed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Value of the `sort` query parameter; results are always ordered by breed.
    pub fn sort_param(self) -> String {
        format!("breed:{}", self.as_str())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dog_uses_wire_field_names() {
        let dog: Dog = serde_json::from_str(
            r#"{"id":"abc","img":"https://img/1.jpg","name":"Rex","age":3,"zip_code":"10001","breed":"Beagle"}"#,
        )
        .expect("decode dog");
        assert_eq!(dog.id, DogId::from("abc"));
        assert_eq!(dog.zip_code, "10001");
    }

    #[test]
    fn negative_age_is_rejected() {
        let result = serde_json::from_str::<Dog>(
            r#"{"id":"abc","img":"x","name":"Rex","age":-1,"zip_code":"1","breed":"Pug"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn sort_param_prefixes_breed() {
        assert_eq!(SortDirection::Asc.sort_param(), "breed:asc");
        assert_eq!(SortDirection::Desc.sort_param(), "breed:desc");
        assert_eq!("Descending".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
