use serde::{Deserialize, Serialize};

/// Which format is the input and which is the output of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "json_to_toon")]
    JsonToStructuredText,
    #[serde(rename = "toon_to_json")]
    StructuredTextToJson,
}

impl Direction {
    pub fn toggle(self) -> Self {
        match self {
            Direction::JsonToStructuredText => Direction::StructuredTextToJson,
            Direction::StructuredTextToJson => Direction::JsonToStructuredText,
        }
    }

    /// Name used on the wire and in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::JsonToStructuredText => "json_to_toon",
            Direction::StructuredTextToJson => "toon_to_json",
        }
    }
}

/// Everything the UI shows that depends on the active direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub direction_label: &'static str,
    pub input_label: &'static str,
    pub output_label: &'static str,
    pub input_placeholder: &'static str,
    pub output_placeholder: &'static str,
    pub example_content: &'static str,
    pub file_extension: &'static str,
    /// Prefix of the second stats line, e.g. "Size reduction"
    pub change_label: &'static str,
}

const EXAMPLE_JSON: &str = r#"{
  "users": [
    {
      "id": 1,
      "name": "Alice",
      "email": "alice@example.com",
      "role": "admin"
    },
    {
      "id": 2,
      "name": "Bob",
      "email": "bob@example.com",
      "role": "user"
    }
  ],
  "metadata": {
    "version": "1.0",
    "timestamp": "2024-01-15T10:30:00Z"
  }
}"#;

const EXAMPLE_TOON: &str = r#"users[2]{id,name,email,role}:
  1,Alice,alice@example.com,admin
  2,Bob,bob@example.com,user
metadata:
  version: "1.0"
  timestamp: "2024-01-15T10:30:00Z""#;

pub fn presentation_for(direction: Direction) -> Presentation {
    match direction {
        Direction::JsonToStructuredText => Presentation {
            direction_label: "JSON → TOON",
            input_label: "JSON Input",
            output_label: "TOON Output",
            input_placeholder: "Paste your JSON here...",
            output_placeholder: "TOON output will appear here...",
            example_content: EXAMPLE_JSON,
            file_extension: "toon",
            change_label: "Size reduction",
        },
        Direction::StructuredTextToJson => Presentation {
            direction_label: "TOON → JSON",
            input_label: "TOON Input",
            output_label: "JSON Output",
            input_placeholder: "Paste your TOON here...",
            output_placeholder: "JSON output will appear here...",
            example_content: EXAMPLE_TOON,
            file_extension: "json",
            change_label: "Size increase",
        },
    }
}
