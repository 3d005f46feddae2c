//! Sample diagrams offered in the example picker.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub name: String,
    pub code: String,
    pub description: String,
}

/// `GET /api/examples` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExamplesResponse {
    pub examples: Vec<Example>,
}

impl ExamplesResponse {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid examples payload: {e}"))
    }
}

fn example(name: &str, description: &str, code: &str) -> Example {
    Example {
        name: name.to_string(),
        code: code.to_string(),
        description: description.to_string(),
    }
}

/// The examples bundled with the editor: sequence, use case, class, and
/// activity diagrams.
pub fn builtin_examples() -> Vec<Example> {
    vec![
        example(
            "Simple sequence diagram",
            "Basic request/response sequence",
            "@startuml
Alice -> Bob: Authentication Request
Bob --> Alice: Authentication Response

Alice -> Bob: Another authentication Request
Alice <-- Bob: Another authentication Response
@enduml",
        ),
        example(
            "Use case diagram",
            "System use cases for one actor",
            "@startuml
left to right direction
actor User as u
rectangle System {
  usecase \"Log in\" as UC1
  usecase \"View profile\" as UC2
  usecase \"Edit profile\" as UC3
}

u --> UC1
u --> UC2
u --> UC3
@enduml",
        ),
        example(
            "Class diagram",
            "Object-oriented class hierarchy",
            "@startuml
class Animal {
  +name: String
  +age: int
  +move()
}

class Dog {
  +breed: String
  +bark()
}

class Cat {
  +color: String
  +catchMice()
}

Animal <|-- Dog
Animal <|-- Cat
@enduml",
        ),
        example(
            "Activity diagram",
            "Business process flow",
            "@startuml
start
:User logs in;
if (Authenticated?) then (yes)
  :Show home page;
  :Choose feature;
  if (Edit?) then (yes)
    :Edit data;
  else (no)
    :View data;
  endif
else (no)
  :Show error message;
endif
stop
@enduml",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_examples_are_complete_documents() {
        let examples = builtin_examples();
        assert_eq!(examples.len(), 4);
        for ex in &examples {
            assert!(ex.code.starts_with("@startuml"), "{}", ex.name);
            assert!(ex.code.ends_with("@enduml"), "{}", ex.name);
        }
    }

    #[test]
    fn examples_payload_roundtrips() {
        let payload = ExamplesResponse {
            examples: builtin_examples(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(ExamplesResponse::from_json(&json).unwrap(), payload);
    }
}
