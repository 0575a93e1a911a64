use truyen_shelf::api::ComicApi;

use serde_json::{json, Value};
use tempfile::tempdir;

use std::fs;

fn call(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_api_full_flow() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path().join("comics"));

    let empty = call(api.get_comics());
    assert_eq!(empty, json!({"success": true, "data": []}));

    let added = call(api.add_comic(json!({
        "title": "Berserk",
        "author": "Miura Kentarou",
        "type": "Manga",
        "status": "Hiatus",
        "genres": ["Action", "Mystery"],
    })));
    assert_eq!(added["success"], json!(true));
    assert_eq!(added["data"]["id"], json!(1));
    assert_eq!(added["data"]["chapters"], json!([]));
    assert_eq!(added["data"]["latest_chapter_at"], json!("N/A"));
    assert_eq!(added["data"]["status"], json!("Hiatus"));

    let chapter = call(api.add_chapter(
        "1",
        json!({"chapter_name": "The Black Swordsman", "vol": 1, "chap": 1, "language": "en"}),
    ));
    assert_eq!(chapter["success"], json!(true));
    assert_eq!(chapter["data"]["vol"], json!(1));
    assert_eq!(chapter["data"]["created_at"], chapter["data"]["updated_at"]);

    let fetched = call(api.get_comic("1"));
    assert_eq!(fetched["data"]["chapters"].as_array().unwrap().len(), 1);
    assert_ne!(fetched["data"]["latest_chapter_at"], json!("N/A"));

    let edited = call(api.edit_comic("1", json!({"star": 4.5})));
    assert_eq!(edited["data"]["star"], json!(4.5));
    assert_eq!(edited["data"]["title"], json!("Berserk"));

    // a second facade over the same root sees everything
    let other = ComicApi::new(dir.path().join("comics"));
    let fetched = call(other.get_comic("1"));
    assert_eq!(fetched["data"]["star"], json!(4.5));
}

#[test]
fn test_api_error_envelopes() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    assert_eq!(
        call(api.get_comic("42")),
        json!({"success": false, "error": "Comic not found"})
    );

    // a missing comic wins over a bad index
    assert_eq!(
        call(api.edit_genre("42", -1, "Action")),
        json!({"success": false, "error": "Comic not found"})
    );

    call(api.add_comic(json!({"title": "empty"})));

    assert_eq!(
        call(api.delete_chapter("1", 1.0, 1.0)),
        json!({"success": false, "error": "Chapter not found"})
    );
    assert_eq!(
        call(api.edit_genre("1", 0, "Action")),
        json!({"success": false, "error": "Genre index out of range"})
    );
    assert_eq!(
        call(api.delete_alt_name("1", -1)),
        json!({"success": false, "error": "Alt name index out of range"})
    );
    assert_eq!(
        call(api.edit_comment("1", 5, json!({"author": "a", "text": "b", "date": "c"}))),
        json!({"success": false, "error": "Comment index out of range"})
    );
    assert_eq!(
        call(api.delete_art("1", 0)),
        json!({"success": false, "error": "Art index out of range"})
    );
}

#[test]
fn test_api_reports_malformed_index() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("comic-index.json"), "not json at all").unwrap();

    let api = ComicApi::new(dir.path());

    let resp = call(api.get_comics());
    assert_eq!(resp["success"], json!(false));
    assert!(!resp["error"].as_str().unwrap().is_empty());

    let resp = call(api.add_comic(json!({"title": "unreachable"})));
    assert_eq!(resp["success"], json!(false));
}

#[test]
fn test_api_delete_comic() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    call(api.add_comic(json!({"title": "short lived"})));
    assert!(dir.path().join("1").is_dir());

    assert_eq!(call(api.delete_comic("1")), json!({"success": true}));
    assert!(!dir.path().join("1").exists());

    assert_eq!(
        call(api.get_comic("1")),
        json!({"success": false, "error": "Comic not found"})
    );
}

#[test]
fn test_api_list_operations() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    call(api.add_comic(json!({"title": "first", "genres": ["Action", "Mystery"]})));
    call(api.add_comic(json!({"title": "second", "genres": ["Action", "Horror"]})));

    // duplicates are skipped for genres but kept for artists
    assert_eq!(
        call(api.add_genre("1", "Action"))["data"],
        json!(["Action", "Mystery"])
    );
    call(api.add_artist("1", "Oda"));
    assert_eq!(
        call(api.add_artist("1", "Oda"))["data"],
        json!(["Oda", "Oda"])
    );

    assert_eq!(
        call(api.edit_genre("1", 1, "Adventure"))["data"],
        json!(["Action", "Adventure"])
    );
    assert_eq!(call(api.delete_genre("1", 0))["data"], json!(["Adventure"]));

    assert_eq!(
        call(api.get_all_genres()),
        json!({"success": true, "data": ["Action", "Adventure", "Horror"]})
    );

    let alt = json!({"language": "en", "name": "The First"});
    assert_eq!(call(api.add_alt_name("1", alt.clone()))["data"], json!([alt]));
    assert_eq!(
        call(api.get_alt_names("1"))["data"],
        json!([{"language": "en", "name": "The First"}])
    );

    let comment = json!({"author": "me", "text": "good", "date": "2024-01-01T00:00:00Z"});
    call(api.add_comment("1", comment.clone()));
    assert_eq!(call(api.get_comments("1"))["data"], json!([comment]));
    assert_eq!(call(api.delete_comment("1", 0))["data"], json!([]));
}

#[test]
fn test_api_scalar_fields() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    call(api.add_comic(json!({"title": "rated"})));

    assert_eq!(call(api.get_star("1"))["data"], json!(0));
    assert_eq!(call(api.set_star("1", 4.0))["data"], json!(4));
    assert_eq!(call(api.set_star("1", 4.5))["data"], json!(4.5));

    assert_eq!(
        call(api.set_description("1", "a long read"))["data"],
        json!("a long read")
    );
    assert_eq!(call(api.get_description("1"))["data"], json!("a long read"));

    assert_eq!(
        call(api.set_demographics("1", json!(["Seinen"])))["data"],
        json!(["Seinen"])
    );
    assert_eq!(call(api.get_demographics("1"))["data"], json!(["Seinen"]));
}

#[test]
fn test_api_rejects_malformed_payloads() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    let rejected = call(api.add_comic(json!({"title": 42})));
    assert_eq!(rejected["success"], json!(false));
    assert!(!rejected["error"].as_str().unwrap().is_empty());

    let rejected = call(api.add_comic(json!({"status": "Airing"})));
    assert_eq!(rejected["success"], json!(false));

    // nothing was persisted by the failed calls
    assert_eq!(call(api.get_comics())["data"], json!([]));
}

#[test]
fn test_api_edit_cannot_change_id_or_chapters() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    call(api.add_comic(json!({"title": "stable"})));
    call(api.add_chapter("1", json!({"vol": 1, "chap": 1})));

    let edited = call(api.edit_comic(
        "1",
        json!({"id": 99, "chapters": [], "title": "renamed"}),
    ));
    assert_eq!(edited["data"]["id"], json!(1));
    assert_eq!(edited["data"]["title"], json!("renamed"));
    assert_eq!(edited["data"]["chapters"].as_array().unwrap().len(), 1);

    assert_eq!(
        call(api.get_comic("99")),
        json!({"success": false, "error": "Comic not found"})
    );
}

#[test]
fn test_api_publication_year_null_clears() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    let added = call(api.add_comic(json!({"title": "dated", "publication_year": 2018})));
    assert_eq!(added["data"]["publication_year"], json!(2018));

    let edited = call(api.edit_comic("1", json!({"star": 3})));
    assert_eq!(edited["data"]["publication_year"], json!(2018));

    let cleared = call(api.edit_comic("1", json!({"publication_year": null})));
    assert_eq!(cleared["data"]["publication_year"], Value::Null);
}

#[test]
fn test_api_chapter_files_follow_edits() {
    let dir = tempdir().unwrap();
    let api = ComicApi::new(dir.path());

    call(api.add_comic(json!({"title": "moving"})));
    call(api.add_chapter("1", json!({"vol": 1, "chap": 5})));
    assert!(dir.path().join("1").join("vol_1_chapter_5.json").is_file());

    let edited = call(api.edit_chapter("1", 1.0, 5.0, json!({"vol": 2, "chap": 1})));
    assert_eq!(edited["success"], json!(true));
    assert!(dir.path().join("1").join("vol_2_chapter_1.json").is_file());
    // the file under the old number is left behind
    assert!(dir.path().join("1").join("vol_1_chapter_5.json").is_file());

    assert_eq!(
        call(api.delete_chapter("1", 2.0, 1.0)),
        json!({"success": true})
    );
    assert!(!dir.path().join("1").join("vol_2_chapter_1.json").exists());
}
