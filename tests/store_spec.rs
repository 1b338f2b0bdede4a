use std::fs;

use rolodex::models::*;
use rolodex::store::{load_reader, ContactStore, StoreError};
use serde_json::json;
use speculate2::speculate;
use tempfile::TempDir;

speculate! {
    before {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let store = ContactStore::open(tmp.path().join("contacts")).expect("Failed to open store");
    }

    describe "open" {
        it "creates the directory" {
            assert!(store.dir().is_dir());
        }
    }

    describe "load" {
        it "mounts the stored bag" {
            fs::write(
                store.dir().join("shiva.json"),
                r#"{"id": 5, "first_name": "Shiva", "objectives": [{"occasion": "birthday", "date_occasion": "1100-02-20"}]}"#,
            ).expect("Failed to write");

            let contact = store.load("shiva").expect("Failed to load");
            assert_eq!(contact.name(), "Shiva");
            assert_eq!(contact.objectives[0].contact_id, Some(5));
            assert_eq!(contact.objectives[0].occasion_date().unwrap(), "02-20");
        }

        it "returns NotFound for a missing contact" {
            let err = store.load("nobody").unwrap_err();
            assert!(matches!(err, StoreError::NotFound(name) if name == "nobody"));
        }

        it "reports malformed files with their origin" {
            fs::write(store.dir().join("broken.json"), "{").expect("Failed to write");

            let err = store.load("broken").unwrap_err();
            assert!(matches!(err, StoreError::Parse { .. }));
            assert!(err.to_string().contains("broken.json"));
        }
    }

    describe "save" {
        it "writes a file that loads back equal" {
            let contact = Contact::make(
                into_bag(json!({ "id": 2, "email": "ada@example.com", "key1": "1" })),
                vec![json!({ "occasion": "anniversary", "sillyData": "y" })],
            );

            let path = store.save("ada", &contact).expect("Failed to save");
            assert!(path.ends_with("ada.json"));

            let loaded = store.load("ada").expect("Failed to load");
            assert_eq!(loaded, contact);
        }
    }

    describe "import and get" {
        it "keeps a reassigned id through save and load" {
            let mut contact = Contact::from(json!({ "id": "pending", "first_name": "Ada" }));
            contact.id = Some(3);
            contact.mount_objectives(vec![json!({ "occasion": "birthday" })]);

            store.save("ada", &contact).expect("Failed to save");
            let loaded = store.load("ada").expect("Failed to load");

            assert_eq!(loaded.id, Some(3));
            assert!(loaded.extra("id").is_none());
            assert_eq!(loaded.objectives[0].contact_id, Some(3));
        }
    }

    describe "list" {
        it "returns an empty list for an empty directory" {
            assert!(store.list().expect("Failed to list").is_empty());
        }

        it "loads json files ordered by name and skips others" {
            store.save("zed", &Contact::from(json!({ "first_name": "Zed" }))).expect("Failed to save");
            store.save("amy", &Contact::from(json!({ "first_name": "Amy" }))).expect("Failed to save");
            fs::write(store.dir().join("README.txt"), "not a contact").expect("Failed to write");

            let contacts = store.list().expect("Failed to list");
            let names: Vec<_> = contacts.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, vec!["amy", "zed"]);
            assert_eq!(contacts[0].1.name(), "Amy");
        }
    }

    describe "load_reader" {
        it "reads from any reader" {
            let input = br#"{"notes": "from stdin"}"#;
            let contact = load_reader(&input[..], "<stdin>").expect("Failed to load");

            assert_eq!(contact.notes(), "from stdin");
            assert!(contact.objectives.is_empty());
        }

        it "names the origin in parse errors" {
            let err = load_reader(&b"nope"[..], "<stdin>").unwrap_err();
            assert!(err.to_string().contains("<stdin>"));
        }
    }
}
