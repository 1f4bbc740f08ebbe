use quire::collection::{Document, DocumentId};
use quire::doc;
use quire::errors::ErrorKind;
use quire_int_test::test_util::{cleanup, create_test_context, run_test};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_multi_threaded_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.fresh_collection()?;
            collection.index(&["thread_id"])?;

            let num_threads = 5;
            let inserts_per_thread = 40;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for thread_id in 0..num_threads {
                let collection = collection.clone();
                let barrier = Arc::clone(&barrier);

                handles.push(thread::spawn(move || {
                    barrier.wait();
                    for i in 0..inserts_per_thread {
                        collection
                            .insert(doc! {
                                thread_id: thread_id,
                                sequence: i,
                                value: (format!("thread_{}_seq_{}", thread_id, i)),
                            })
                            .expect("insert should succeed");
                    }
                }));
            }

            for handle in handles {
                handle.join().expect("writer panicked");
            }

            assert_eq!(collection.size()?, (num_threads * inserts_per_thread) as u64);
            for thread_id in 0..num_threads {
                let ids = collection.lookup(&["thread_id"], &Document::from(thread_id), 0)?;
                assert_eq!(ids.len(), inserts_per_thread);
            }
            Ok(())
        },
        cleanup,
    )
}

// Writers keep rewriting their own documents while readers look them up by
// owner. An owner never changes, so every id a lookup returns must read back
// as a document of that owner.
#[test]
fn test_readers_never_see_half_written_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.fresh_collection()?;
            collection.index(&["owner"])?;
            collection.index(&["revision"])?;

            let writers = 3usize;
            let readers = 4usize;
            let docs_per_writer = 20usize;
            let rounds = 30usize;

            let mut owned: Vec<Vec<DocumentId>> = Vec::new();
            for owner in 0..writers {
                let mut ids = Vec::new();
                for slot in 0..docs_per_writer {
                    ids.push(
                        collection
                            .insert(doc! { owner: owner, slot: slot, revision: 0 })?
                            .id(),
                    );
                }
                owned.push(ids);
            }

            let barrier = Arc::new(Barrier::new(writers + readers));
            let done = Arc::new(AtomicBool::new(false));
            let checked = Arc::new(AtomicUsize::new(0));

            let mut writer_handles = vec![];
            for (owner, ids) in owned.into_iter().enumerate() {
                let collection = collection.clone();
                let barrier = Arc::clone(&barrier);
                writer_handles.push(thread::spawn(move || {
                    barrier.wait();
                    for revision in 1..=rounds {
                        for (slot, id) in ids.iter().enumerate() {
                            collection
                                .update(*id, doc! { owner: owner, slot: slot, revision: revision })
                                .expect("update should succeed");
                        }
                    }
                }));
            }

            let mut reader_handles = vec![];
            for reader in 0..readers {
                let collection = collection.clone();
                let barrier = Arc::clone(&barrier);
                let done = Arc::clone(&done);
                let checked = Arc::clone(&checked);
                reader_handles.push(thread::spawn(move || {
                    barrier.wait();
                    let owner = reader % writers;
                    loop {
                        let finished = done.load(Ordering::Acquire);
                        let ids = collection
                            .lookup(&["owner"], &Document::from(owner), 0)
                            .expect("lookup should succeed");
                        assert_eq!(ids.len(), docs_per_writer);

                        for id in ids {
                            let document = collection.read(id).expect("indexed document must exist");
                            assert_eq!(document.get("owner"), Some(&Document::from(owner)));
                            checked.fetch_add(1, Ordering::Relaxed);
                        }
                        if finished {
                            break;
                        }
                    }
                }));
            }

            for handle in writer_handles {
                handle.join().expect("writer panicked");
            }
            done.store(true, Ordering::Release);
            for handle in reader_handles {
                handle.join().expect("reader panicked");
            }

            assert!(checked.load(Ordering::Relaxed) > 0);
            let latest = collection.lookup(&["revision"], &Document::from(rounds), 0)?;
            assert_eq!(latest.len(), writers * docs_per_writer);
            assert!(collection.lookup(&["revision"], &Document::from(0), 0)?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_index_creation_and_inserts() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.fresh_collection()?;
            let barrier = Arc::new(Barrier::new(3));

            let inserter = {
                let collection = collection.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..200 {
                        collection
                            .insert(doc! { color: (if i % 2 == 0 { "red" } else { "blue" }) })
                            .expect("insert should succeed");
                    }
                })
            };

            // both threads race to create the same index; exactly one wins
            let indexers: Vec<_> = (0..2)
                .map(|_| {
                    let collection = collection.clone();
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        collection.index(&["color"]).map_err(|e| e.kind().clone())
                    })
                })
                .collect();

            inserter.join().expect("inserter panicked");
            let outcomes: Vec<_> = indexers
                .into_iter()
                .map(|handle| handle.join().expect("indexer panicked"))
                .collect();
            assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
            assert!(outcomes
                .iter()
                .any(|outcome| outcome == &Err(ErrorKind::AlreadyIndexed)));

            // whenever the index was built, it covers every document
            let red = collection.lookup(&["color"], &"red".into(), 0)?;
            let blue = collection.lookup(&["color"], &"blue".into(), 0)?;
            assert_eq!(red.len(), 100);
            assert_eq!(blue.len(), 100);
            Ok(())
        },
        cleanup,
    )
}
