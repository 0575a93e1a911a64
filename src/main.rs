use truyen_shelf::api::ComicApi;
use truyen_shelf::store::{ComicStore, DEFAULT_ROOT};

use serde_json::{json, Value};

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

fn main() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let (writer, _guard) = tracing_appender::non_blocking(
        std::fs::File::options()
            .create(true)
            .append(true)
            .open("truyen-shelf.log")
            .unwrap(),
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .compact(),
        )
        .with(filter)
        .init();

    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ROOT.to_string());

    let api = ComicApi::new(&root);

    let shelf: Value = serde_json::from_str(&api.get_comics()).unwrap();
    if !shelf["success"].as_bool().unwrap() {
        panic!("failed to load the catalog: {}", shelf["error"]);
    }

    if shelf["data"].as_array().unwrap().is_empty() {
        let added: Value = serde_json::from_str(&api.add_comic(json!({
            "title": "Solo Leveling",
            "author": "Chugong",
            "type": "Manhwa",
            "status": "Completed",
            "original_language": "ko",
            "genres": ["Action", "Fantasy"],
        })))
        .unwrap();

        let id = added["data"]["id"].to_string();

        api.add_chapter(
            &id,
            json!({"chapter_name": "I'm used to it", "vol": 1, "chap": 1, "language": "en"}),
        );
        api.add_chapter(
            &id,
            json!({"chapter_name": "If I had been a bit stronger", "vol": 1, "chap": 2, "language": "en"}),
        );
    }

    let shelf: Value = serde_json::from_str(&api.get_comics()).unwrap();

    for comic in shelf["data"].as_array().unwrap() {
        println!(
            "[{}] {} by {}, {} chapters",
            comic["id"],
            comic["title"].as_str().unwrap(),
            comic["author"].as_str().unwrap(),
            comic["chapters"].as_array().unwrap().len()
        );

        for chapter in comic["chapters"].as_array().unwrap() {
            println!(
                "    vol {} chapter {}: {}",
                chapter["vol"],
                chapter["chap"],
                chapter["chapter_name"].as_str().unwrap()
            );
        }
    }

    let report = ComicStore::new(&root).validate().unwrap();
    if !report.is_clean() {
        println!("inconsistencies found: {report:#?}");
    }
}
