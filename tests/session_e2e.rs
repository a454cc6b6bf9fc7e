use docshelf::cli::CommandReader;
use docshelf::commands::Dispatcher;
use docshelf::core::operations::StoreGateway;
use docshelf::store::{self, ConnectOptions};
use std::io::{Cursor, sink};

async fn session(script: &str) -> (usize, String) {
    let store = store::connect("builtin://localhost/demo", ConnectOptions::default())
        .await
        .unwrap();
    let gateway = StoreGateway::new(store);
    for (_, result) in gateway.open_all().await {
        result.unwrap();
    }

    let reader = CommandReader::new(Cursor::new(script.to_string()), sink());
    let mut out = Vec::new();
    let executed = Dispatcher::new(&gateway).run(reader, &mut out).await.unwrap();
    gateway.close().await.unwrap();
    (executed, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn seed_list_and_search() {
    let (executed, text) = session("Y\n3\nY\n1\nY\n2\nComp\nN\n").await;
    assert_eq!(executed, 3);

    let list_start = text.find("total documents").unwrap();
    let listing = &text[list_start..];
    let it = listing.find("IT industry").unwrap();
    let computers = listing.find("Computers").unwrap();
    let trending = listing.find("Trending Modern computer Technologies").unwrap();
    assert!(it < computers && computers < trending);

    let search_start = list_start + listing[1..].find("total documents").unwrap() + 1;
    let search = &text[search_start..];
    assert!(search.contains("Computers"));
    assert!(!search.contains("IT industry"));
    assert!(!search.contains("Trending Modern computer Technologies"));
}

#[tokio::test]
async fn update_then_drop() {
    let script = "Y\n3\nY\n4\nIT industry\n2001\nY\n6\njournals\nY\n1\nN\n";
    let (executed, text) = session(script).await;
    assert_eq!(executed, 4);
    assert!(text.contains("Updated 1 journal(s)"));
    assert!(text.contains("Table 'journals' was deleted"));
    assert!(text.contains("Namespace 'journals' does not exist"));
}

#[tokio::test]
async fn end_of_input_ends_session() {
    let (executed, text) = session("maybe\nY\n9\n").await;
    assert_eq!(executed, 0);
    assert!(text.is_empty());
}
