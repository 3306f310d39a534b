/// Per-kind `watch_entity_*` wrappers around `watch`.
///
/// The blocking form returns an `EventFilter`, the async form an
/// `AsyncEventFilter`. Both start it when `auto_start` is set.
macro_rules! watch_helpers {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            #[doc = concat!("Watch `", stringify!($kind), "` events.")]
            pub fn $name(
                &self,
                callback: ak_04_event_watch::EventCallback,
                from_block: impl Into<shared_types::BlockTag>,
                auto_start: bool,
            ) -> $crate::error::Result<ak_04_event_watch::EventFilter> {
                self.watch(shared_types::EventKind::$kind, callback, from_block, auto_start)
            }
        )*
    };
}

macro_rules! async_watch_helpers {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            #[doc = concat!("Watch `", stringify!($kind), "` events.")]
            pub async fn $name(
                &self,
                callback: ak_04_event_watch::AsyncEventCallback,
                from_block: impl Into<shared_types::BlockTag>,
                auto_start: bool,
            ) -> $crate::error::Result<ak_04_event_watch::AsyncEventFilter> {
                self.watch(shared_types::EventKind::$kind, callback, from_block, auto_start)
                    .await
            }
        )*
    };
}
