//! Fixture sets for E2E tests.
//!
//! `minimal_fixtures` carries just enough data for focused scenarios;
//! `shipped_fixtures` loads the repository's real fixture files so the
//! full suite definitions run against exactly what ships.

use migcheck_fixture::FixtureSet;

const APPLICATION_JSON: &str = r#"{
    "bookserver-app": {
        "location": {
            "type": "repository",
            "kind": "Git",
            "url": "https://github.com/konveyor/example-applications",
            "root_path": "example-1"
        }
    }
}"#;

const ANALYSIS_JSON: &str = r#"{
    "source_analysis": {
        "targets": ["eap7"]
    },
    "source_analysis_with_expectations": {
        "targets": ["eap7"],
        "expectations": {
            "story_points": 5,
            "incidents": [
                { "category": "mandatory", "incidents": 24 }
            ]
        }
    }
}"#;

/// A one-application fixture set for focused scenarios.
pub fn minimal_fixtures() -> FixtureSet {
    FixtureSet::parse(APPLICATION_JSON, ANALYSIS_JSON).expect("minimal fixtures must parse")
}

/// The repository's shipped fixture files.
pub async fn shipped_fixtures() -> FixtureSet {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures");
    FixtureSet::load(dir)
        .await
        .expect("shipped fixture files must load")
}
