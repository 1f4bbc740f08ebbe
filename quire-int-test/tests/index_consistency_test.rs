use quire::collection::{Collection, Document, DocumentId};
use quire::doc;
use quire::errors::QuireResult;
use quire_int_test::test_util::{cleanup, create_test_context, run_test};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};

const COLORS: [&str; 5] = ["red", "green", "blue", "black", "white"];
const CITIES: [&str; 4] = ["Oslo", "Bergen", "Tromso", "Bodo"];

fn random_document(rng: &mut StdRng) -> Document {
    let tag_count = rng.random_range(0..4);
    let tags: Vec<Document> = (0..tag_count)
        .map(|_| Document::from(COLORS[rng.random_range(0..COLORS.len())]))
        .collect();

    let mut document = doc! {
        address: { city: (CITIES[rng.random_range(0..CITIES.len())]) },
        rank: (rng.random_range(0i32..5)),
    };
    document
        .put("tags", tags)
        .expect("document is a map");
    document
}

// Ids whose document holds `value` somewhere along `path`, computed from
// the model instead of the index.
fn expected_ids(
    model: &BTreeMap<DocumentId, Document>,
    path: &[&str],
    value: &Document,
) -> BTreeSet<DocumentId> {
    model
        .iter()
        .filter(|(_, document)| holds(document, path, value))
        .map(|(id, _)| *id)
        .collect()
}

fn holds(node: &Document, path: &[&str], value: &Document) -> bool {
    match (path.split_first(), node) {
        (None, Document::Array(items)) => items.iter().any(|item| item == value),
        (None, other) => other == value,
        (Some((head, rest)), Document::Map(_)) => node
            .get(head)
            .map(|child| holds(child, rest, value))
            .unwrap_or(false),
        (Some(_), Document::Array(items)) => items
            .iter()
            .any(|item| item.is_map() && holds(item, path, value)),
        (Some(_), _) => false,
    }
}

fn indexed_ids(
    collection: &Collection,
    path: &[&str],
    value: &Document,
) -> QuireResult<BTreeSet<DocumentId>> {
    Ok(collection.lookup(path, value, 0)?.into_iter().collect())
}

fn lookup_values() -> Vec<(Vec<&'static str>, Document)> {
    let mut lookup_values = Vec::new();
    for color in COLORS {
        lookup_values.push((vec!["tags"], Document::from(color)));
    }
    for city in CITIES {
        lookup_values.push((vec!["address", "city"], Document::from(city)));
    }
    for rank in 0i32..5 {
        lookup_values.push((vec!["rank"], Document::from(rank)));
    }
    lookup_values
}

fn assert_consistent(
    collection: &Collection,
    model: &BTreeMap<DocumentId, Document>,
) -> QuireResult<()> {
    for (path, value) in lookup_values() {
        assert_eq!(
            indexed_ids(collection, &path, &value)?,
            expected_ids(model, &path, &value),
            "index on {:?} disagrees for {:?}",
            path,
            value
        );
    }
    Ok(())
}

#[test]
fn test_random_workload_keeps_indexes_consistent() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.fresh_collection()?;
            collection.index(&["tags"])?;
            collection.index(&["address", "city"])?;

            let mut rng = StdRng::seed_from_u64(7);
            let mut model: BTreeMap<DocumentId, Document> = BTreeMap::new();

            for step in 0..600 {
                // the third index arrives halfway and must be backfilled
                if step == 300 {
                    collection.index(&["rank"])?;
                }

                let ids: Vec<DocumentId> = model.keys().copied().collect();
                match rng.random_range(0..10) {
                    0..=4 => {
                        let document = random_document(&mut rng);
                        let id = collection.insert(document.clone())?.id();
                        model.insert(id, document);
                    }
                    5..=7 if !ids.is_empty() => {
                        let id = ids[rng.random_range(0..ids.len())];
                        let document = random_document(&mut rng);
                        assert!(collection.update(id, document.clone())?.is_clean());
                        model.insert(id, document);
                    }
                    8..=9 if !ids.is_empty() => {
                        let id = ids[rng.random_range(0..ids.len())];
                        assert!(collection.delete(id)?.is_clean());
                        model.remove(&id);
                    }
                    _ => {}
                }
            }

            assert_eq!(collection.size()?, model.len() as u64);
            assert_consistent(&collection, &model)?;

            // rebuilding from scratch yields exactly the same entries
            let before: Vec<_> = lookup_values()
                .into_iter()
                .map(|(path, value)| indexed_ids(&collection, &path, &value))
                .collect::<QuireResult<_>>()?;
            for path in collection.all_indexes()? {
                collection.reindex(path.segments())?;
            }
            let after: Vec<_> = lookup_values()
                .into_iter()
                .map(|(path, value)| indexed_ids(&collection, &path, &value))
                .collect::<QuireResult<_>>()?;
            assert_eq!(before, after);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failed_write_leaves_indexes_untouched() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.fresh_collection()?;
            collection.index(&["name"])?;
            let id = collection.insert(doc! { name: "kept" })?.id();

            // encoding fails before anything is written
            assert!(collection
                .update(id, doc! { name: "lost", score: (f64::INFINITY) })
                .is_err());

            assert_eq!(collection.read(id)?, doc! { name: "kept" });
            assert_eq!(collection.lookup(&["name"], &"kept".into(), 0)?, vec![id]);
            assert!(collection.lookup(&["name"], &"lost".into(), 0)?.is_empty());
            Ok(())
        },
        cleanup,
    )
}
