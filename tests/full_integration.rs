//! Full integration tests exercising concurrency, hot reload and codecs together.

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use treeconf::prelude::*;

#[test]
fn test_store_functions_are_thread_safe() {
    let store = Store::new();
    store.set("name", "gopher").unwrap();

    let barrier = Arc::new(Barrier::new(3));
    let mut handles = Vec::new();

    {
        let (store, barrier) = (store.clone(), Arc::clone(&barrier));
        handles.push(thread::spawn(move || {
            barrier.wait();
            if store.load(b"name: gopher").is_err() {
                let _ = store.get("name");
            }
        }));
    }
    {
        let (store, barrier) = (store.clone(), Arc::clone(&barrier));
        handles.push(thread::spawn(move || {
            barrier.wait();
            let _ = store.unset("name");
        }));
    }
    {
        let (store, barrier) = (store.clone(), Arc::clone(&barrier));
        handles.push(thread::spawn(move || {
            barrier.wait();
            if store.get_string("name").is_ok() {
                let _ = store.unset("name");
            } else {
                store.set("name", "").unwrap();
            }
            if store.get_bool("name").is_err() {
                store.set("name", false).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Whatever the interleaving, the tree is intact and holds only "name".
    let snapshot = store.snapshot().unwrap();
    assert!(snapshot.len() <= 1);
    assert!(snapshot.keys().all(|k| k == "name"));
}

#[test]
fn test_concurrent_distinct_keys() {
    let store = Store::new();
    store.load(b"shared:\n  untouched: 42\n").unwrap();

    let workers = 8;
    let rounds = 500;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let key = format!("shared:worker-{worker}:value");
                barrier.wait();
                for round in 0..rounds {
                    store.set(&key, round).unwrap();
                    assert_eq!(store.get_int(&key).unwrap(), i64::from(round));
                    if round % 3 == 0 {
                        store.unset(&key).unwrap();
                        assert!(store.get(&key).unwrap_err().is_not_found());
                    }
                }
                // Last operation of each worker is a set of the final round.
                store.set(&key, rounds).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for worker in 0..workers {
        let key = format!("shared:worker-{worker}:value");
        assert_eq!(store.get_int(&key).unwrap(), i64::from(rounds));
    }
    assert_eq!(store.get_int("shared:untouched").unwrap(), 42);
}

#[test]
fn test_readers_never_see_partial_load() {
    let store = Store::new();
    store.load(b"a: 1\nb: 1\n").unwrap();

    let reader = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..2_000 {
                let snapshot = store.snapshot().unwrap();
                // Both keys always come from the same document.
                assert_eq!(snapshot["a"], snapshot["b"]);
            }
        })
    };

    for i in 0..200 {
        let doc = format!("a: {i}\nb: {i}\n");
        store.load(doc.as_bytes()).unwrap();
    }
    reader.join().unwrap();
}

fn bump_mtime(path: &std::path::Path, secs: u64) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(secs))
        .unwrap();
}

async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..500 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[cfg(feature = "file-watch")]
#[tokio::test]
async fn test_hot_reload_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "server:\n  port: 8080\n  host: localhost\n").unwrap();

    let store = Store::builder()
        .with_poll_interval(Duration::from_millis(25))
        .build();
    let watch = store.load_and_watch(&path).await.unwrap();

    // A clone handed out before the reload sees the new tree as well.
    let reader = store.clone();
    assert_eq!(reader.get_int("server:port").unwrap(), 8080);

    fs::write(&path, "server:\n  port: 9090\n  host: localhost\n").unwrap();
    bump_mtime(&path, 10);
    assert!(eventually(|| reader.get_int("server:port").ok() == Some(9090)).await);

    fs::write(&path, "server: [unterminated\n").unwrap();
    bump_mtime(&path, 20);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(reader.get_int("server:port").unwrap(), 9090);
    assert_eq!(reader.get_string("server:host").unwrap(), "localhost");

    watch.shutdown().await;
}

#[cfg(feature = "file-watch")]
#[tokio::test]
async fn test_local_sets_survive_until_next_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "level: info\n").unwrap();

    let store = Store::builder()
        .with_poll_interval(Duration::from_millis(25))
        .build();
    let watch = store.load_and_watch(&path).await.unwrap();

    store.set("level", "debug").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.get_string("level").unwrap(), "debug");

    fs::write(&path, "level: warn\n").unwrap();
    bump_mtime(&path, 10);
    assert!(eventually(|| store.get_string("level").ok().as_deref() == Some("warn")).await);

    watch.shutdown().await;
}

#[test]
#[allow(unsafe_code)] // For env var manipulation in tests
fn test_env_expansion_from_file() {
    unsafe {
        std::env::set_var("TREECONF_IT_DB_PASSWORD", "s3cr3t");
    }

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(
        &path,
        "database:\n  password: $TREECONF_IT_DB_PASSWORD\n  url: postgres://root:${TREECONF_IT_DB_PASSWORD}@db/app\n",
    )
    .unwrap();

    let store = Store::builder().with_env_expansion(true).build();
    store.load_file(&path).unwrap();
    assert_eq!(store.get_string("database:password").unwrap(), "s3cr3t");
    assert_eq!(
        store.get_string("database:url").unwrap(),
        "postgres://root:s3cr3t@db/app"
    );
}

#[cfg(feature = "json")]
#[test]
fn test_json_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let store = Store::builder().with_format_of(&path).unwrap().build();
    store.set("database:port", 5432).unwrap();
    store.set("database:ratio", 0.75).unwrap();
    store.set("features", vec!["a", "b"]).unwrap();
    store.save(&path, 0o644).unwrap();

    let reloaded = Store::builder().with_format_of(&path).unwrap().build();
    reloaded.load_file(&path).unwrap();
    assert_eq!(reloaded.snapshot(), store.snapshot());
}

#[cfg(feature = "toml")]
#[test]
fn test_toml_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let store = Store::builder().with_format_of(&path).unwrap().build();
    store.set("name", "app").unwrap();
    store.set("database:port", 5432).unwrap();
    store.save(&path, 0o644).unwrap();

    let reloaded = Store::builder().with_format_of(&path).unwrap().build();
    reloaded.load_file(&path).unwrap();
    assert_eq!(reloaded.get_int("database:port").unwrap(), 5432);
    assert_eq!(reloaded.get_string("name").unwrap(), "app");
}
