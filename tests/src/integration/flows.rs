//! # Blocking Client Flows
//!
//! Drives [`arkiv_client::ArkivClient`] through the in-memory node:
//!
//! 1. **Lifecycle**: create → read → update → extend → change owner → delete
//! 2. **Paging**: multi-page iteration pinned to one block
//! 3. **Watchers**: delivery, expiry, failing callbacks, transport errors
//! 4. **Cleanup**: filters are uninstalled when the client is dropped

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use arkiv_client::{
        callback, ArkivClient, CallbackError, ClientConfig, ClientError, QueryOptions,
    };
    use parking_lot::Mutex;
    use shared_types::{
        Address, Attributes, BlockTag, CreateOp, EntityKey, Event, Fields, Operations,
    };

    use crate::fixtures::{wait_until, InMemoryNode, DEFAULT_SENDER};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn setup() -> (Arc<InMemoryNode>, ArkivClient) {
        let node = Arc::new(InMemoryNode::new());
        let config = ClientConfig {
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        };
        let client = ArkivClient::new(node.clone(), config).unwrap();
        (node, client)
    }

    // Strings first: the node hands attributes back as string list, then numeric list.
    fn note(title: &str, priority: u64) -> Attributes {
        Attributes::new()
            .with("type", "note")
            .with("title", title)
            .with("priority", priority)
    }

    fn recorder() -> (Arc<Mutex<Vec<Event>>>, arkiv_client::EventCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let cb = callback(move |event: &Event, _| {
            sink.lock().push(event.clone());
            Ok(())
        });
        (seen, cb)
    }

    // =============================================================================
    // LIFECYCLE
    // =============================================================================

    #[test]
    fn test_entity_lifecycle() {
        let (node, client) = setup();

        let (key, _) = client
            .create_entity(
                Some(b"hello".to_vec()),
                Some("text/plain".into()),
                Some(note("first", 3)),
                Some(100),
            )
            .unwrap();
        let created_at = node.block_number();

        let entity = client.get_entity(key, Fields::ALL).unwrap();
        assert_eq!(entity.key, Some(key));
        assert_eq!(entity.owner, Some(DEFAULT_SENDER));
        assert_eq!(entity.payload.as_deref(), Some(&b"hello"[..]));
        assert_eq!(entity.content_type.as_deref(), Some("text/plain"));
        assert_eq!(entity.expires_at_block, Some(created_at + 100));
        assert_eq!(entity.attributes, Some(note("first", 3)));

        let (updated, _) = client
            .update_entity(key, Some(b"bye".to_vec()), None, None, Some(50))
            .unwrap();
        assert_eq!(updated.old_expiration_block, created_at + 100);
        assert_eq!(updated.new_expiration_block, node.block_number() + 50);

        let entity = client.get_entity(key, Fields::PAYLOAD | Fields::ATTRIBUTES).unwrap();
        assert_eq!(entity.payload.as_deref(), Some(&b"bye"[..]));
        assert_eq!(entity.attributes, Some(Attributes::new()));
        assert_eq!(entity.owner, None);

        let (extended, _) = client.extend_entity(key, 25).unwrap();
        assert_eq!(
            extended.new_expiration_block,
            extended.old_expiration_block + 25
        );

        let new_owner = Address::repeat_byte(0x77);
        let (changed, _) = client.change_owner(key, new_owner).unwrap();
        assert_eq!(changed.old_owner_address, DEFAULT_SENDER);
        assert_eq!(changed.new_owner_address, new_owner);
        let entity = client.get_entity(key, Fields::OWNER).unwrap();
        assert_eq!(entity.owner, Some(new_owner));

        assert!(client.entity_exists(&key.to_string()));
        let (deleted, _) = client.delete_entity(key).unwrap();
        assert_eq!(deleted.entity_key, key);
        assert_eq!(deleted.owner_address, new_owner);
        assert!(!client.entity_exists(&key.to_string()));
        assert!(matches!(
            client.get_entity(key, Fields::ALL),
            Err(ClientError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn test_defaults_apply_to_bare_create() {
        let (node, client) = setup();
        let (key, _) = client.create_entity(None, None, None, None).unwrap();

        let entity = client.get_entity(key, Fields::ALL).unwrap();
        assert_eq!(entity.payload, Some(Vec::new()));
        assert_eq!(entity.content_type.as_deref(), Some("application/octet-stream"));
        assert_eq!(
            entity.expires_at_block,
            Some(node.block_number() + client.config().default_btl)
        );
    }

    #[test]
    fn test_missing_entity_reverts() {
        let (node, client) = setup();
        let before = node.block_number();

        let result = client.delete_entity(EntityKey::from(42u64));
        assert!(matches!(result, Err(ClientError::TransactionFailed { .. })));
        // The reverted transaction still consumed a block.
        assert_eq!(node.block_number(), before + 1);
        assert_eq!(node.entity_count(), 0);
    }

    #[test]
    fn test_entity_exists_rejects_malformed_keys() {
        let (node, client) = setup();
        assert!(!client.entity_exists("0x1234"));
        assert!(!client.entity_exists("not a key"));
        assert_eq!(node.query_count(), 0);
    }

    #[test]
    fn test_batch_creates_get_distinct_keys() {
        let (_node, client) = setup();
        let ops = (0..3)
            .fold(Operations::builder(), |b, i| {
                b.create(CreateOp {
                    payload: vec![i],
                    content_type: "application/octet-stream".into(),
                    attributes: Attributes::new(),
                    btl: 10,
                })
            })
            .build()
            .unwrap();

        let receipt = client.execute(&ops, None).unwrap();
        assert_eq!(receipt.creates.len(), 3);
        let mut keys: Vec<_> = receipt.creates.iter().map(|c| c.entity_key).collect();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    // =============================================================================
    // QUERIES
    // =============================================================================

    fn create_many(client: &ArkivClient, count: u64) {
        let ops = (0..count)
            .fold(Operations::builder(), |b, i| {
                b.create(CreateOp {
                    payload: i.to_be_bytes().to_vec(),
                    content_type: "application/octet-stream".into(),
                    attributes: Attributes::new().with("seq", i),
                    btl: 1_000,
                })
            })
            .build()
            .unwrap();
        client.execute(&ops, None).unwrap();
    }

    #[test]
    fn test_paging_yields_every_entity_from_one_block() {
        let (node, client) = setup();
        create_many(&client, 25);
        let head = node.block_number();

        let mut iter =
            client.query_entities_iter("1 = 1", QueryOptions::default().with_page_size(10));
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.attributes.unwrap().get("seq").and_then(|v| v.as_numeric()), Some(0));

        // New blocks mid-iteration do not move the pinned block.
        node.mine_blocks(3);
        let rest: Vec<_> = iter.by_ref().collect::<Result<_, _>>().unwrap();

        assert_eq!(rest.len(), 24);
        assert_eq!(iter.block_number(), Some(head));
        assert_eq!(iter.pages_fetched(), 3);
        assert_eq!(node.query_count(), 3);
    }

    #[test]
    fn test_query_builder_filters_and_counts() {
        let (node, client) = setup();
        for i in 0..4 {
            client
                .create_entity(None, None, Some(note("n", i % 2)), None)
                .unwrap();
        }
        client
            .create_entity(None, None, Some(Attributes::new().with("type", "image")), None)
            .unwrap();

        let notes: Vec<_> = client
            .select(Fields::KEY | Fields::ATTRIBUTES)
            .where_("type = \"note\"")
            .page_size(3)
            .fetch()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(notes.len(), 4);
        assert!(notes.iter().all(|e| e.payload.is_none()));

        let high = client.select(Fields::KEY).where_("priority = 1").count().unwrap();
        assert_eq!(high, 2);

        let limited: Vec<_> = client
            .select(Fields::KEY)
            .limit(2)
            .page_size(2)
            .fetch()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert!(node.query_count() >= 4);
    }

    #[test]
    fn test_owner_query_sees_ownership_change() {
        let (_node, client) = setup();
        let (key, _) = client.create_entity(None, None, None, None).unwrap();
        client.create_entity(None, None, None, None).unwrap();
        let new_owner = Address::repeat_byte(0x33);
        client.change_owner(key, new_owner).unwrap();

        let query = format!("$owner = 0x{}", hex::encode(new_owner.as_bytes()));
        let owned: Vec<_> = client
            .select(Fields::KEY)
            .where_(query)
            .fetch()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].key, Some(key));
    }

    // =============================================================================
    // WATCHERS
    // =============================================================================

    #[test]
    fn test_created_events_are_delivered() {
        let (_node, client) = setup();
        let (seen, cb) = recorder();
        let filter = client.watch_entity_created(cb, BlockTag::Latest, true).unwrap();
        assert!(filter.is_running());

        let (a, _) = client.create_entity(None, None, None, None).unwrap();
        let (b, _) = client.create_entity(None, None, None, None).unwrap();

        assert!(wait_until(|| seen.lock().len() == 2));
        let keys: Vec<_> = seen.lock().iter().map(Event::entity_key).collect();
        assert_eq!(keys, vec![a, b]);
    }

    #[test]
    fn test_earliest_replays_history() {
        let (_node, client) = setup();
        let (key, _) = client.create_entity(None, None, None, None).unwrap();
        client.delete_entity(key).unwrap();

        let (seen, cb) = recorder();
        client.watch_entity_deleted(cb, BlockTag::Earliest, true).unwrap();
        assert!(wait_until(|| seen.lock().len() == 1));
        assert_eq!(seen.lock()[0].entity_key(), key);
    }

    #[test]
    fn test_expiry_is_watched() {
        let (node, client) = setup();
        let (seen, cb) = recorder();
        client.watch_entity_expired(cb, BlockTag::Latest, true).unwrap();

        let (key, _) = client.create_entity(None, None, None, Some(2)).unwrap();
        node.mine_blocks(2);

        assert!(wait_until(|| seen.lock().len() == 1));
        assert!(matches!(&seen.lock()[0], Event::Expired(e) if e.entity_key == key));
        assert_eq!(node.entity_count(), 0);
    }

    #[test]
    fn test_failing_callback_does_not_stop_delivery() {
        let (_node, client) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cb = callback(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(CallbackError::new("first delivery rejected"));
            }
            Ok(())
        });
        client.watch_entity_created(cb, BlockTag::Latest, true).unwrap();

        client.create_entity(None, None, None, None).unwrap();
        client.create_entity(None, None, None, None).unwrap();
        assert!(wait_until(|| calls.load(Ordering::SeqCst) == 2));
    }

    #[test]
    fn test_panicking_callback_is_isolated() {
        let (_node, client) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cb = callback(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("callback bug");
            }
            Ok(())
        });
        let filter = client.watch_entity_created(cb, BlockTag::Latest, true).unwrap();

        client.create_entity(None, None, None, None).unwrap();
        client.create_entity(None, None, None, None).unwrap();
        assert!(wait_until(|| calls.load(Ordering::SeqCst) == 2));
        assert!(filter.is_running());
    }

    #[test]
    fn test_poll_errors_are_retried() {
        let (node, client) = setup();
        let (seen, cb) = recorder();
        client.watch_entity_created(cb, BlockTag::Latest, true).unwrap();
        node.fail_next_polls(3);

        client.create_entity(None, None, None, None).unwrap();
        assert!(wait_until(|| seen.lock().len() == 1));
        assert!(node.poll_count() >= 4);
    }

    #[test]
    fn test_watch_without_auto_start_is_idle() {
        let (node, client) = setup();
        let (seen, cb) = recorder();
        let filter = client.watch_entity_updated(cb, BlockTag::Latest, false).unwrap();

        assert!(!filter.is_running());
        assert_eq!(node.installed_filters(), 0);

        filter.start().unwrap();
        let (key, _) = client.create_entity(None, None, None, None).unwrap();
        client.update_entity(key, None, None, None, None).unwrap();
        assert!(wait_until(|| seen.lock().len() == 1));
    }

    #[test]
    fn test_drop_uninstalls_filters() {
        let (node, client) = setup();
        let (_, created) = recorder();
        let (_, deleted) = recorder();
        client.watch_entity_created(created, BlockTag::Latest, true).unwrap();
        let deleted = client.watch_entity_deleted(deleted, BlockTag::Latest, true).unwrap();

        assert_eq!(node.installed_filters(), 2);
        assert_eq!(client.active_filters().len(), 2);

        drop(client);
        assert_eq!(node.installed_filters(), 0);
        assert!(!deleted.is_running());
    }

    #[test]
    fn test_entity_key_text_roundtrip_through_node() {
        let (_node, client) = setup();
        let (key, _) = client.create_entity(None, None, None, None).unwrap();
        let text = key.to_string().to_uppercase().replacen("0X", "0x", 1);
        assert_eq!(EntityKey::from_str(&text).unwrap(), key);
        assert!(client.entity_exists(&text));
    }
}
