use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::context::RemoteContext;
use crate::error::PortalError;
use crate::program::RecordItem;
use crate::program::SharedRecord;
use crate::pubkey::Pubkey;

/// One shared link, with the account that submitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub link: String,
    pub submitted_by: Pubkey,
}

impl From<RecordItem> for Item {
    fn from(item: RecordItem) -> Self {
        Self {
            link: item.gif_link,
            submitted_by: item.user_address,
        }
    }
}

/// What the page knows about the shared record.
#[derive(Debug, Clone, PartialEq, Eq, Default, strum::EnumIs)]
pub enum ItemListState {
    #[default]
    NotFetched,
    /// The record does not exist yet.
    Absent,
    /// Items in the order the record stores them.
    Populated(Vec<Item>),
}

/// Reads the shared record.
///
/// A missing record is `Ok(Absent)`; transport and decoding failures are
/// [`PortalError::ReadFailed`], so callers can tell the two apart.
pub async fn fetch_items(ctx: &RemoteContext, record: &Pubkey) -> Result<ItemListState, PortalError> {
    let data = ctx
        .rpc()
        .account_data(record, ctx.commitment())
        .await
        .map_err(|e| {
            warn!("reading record {} failed: {}", record, e);
            PortalError::ReadFailed(e.to_string())
        })?;

    // an account with no data has never been initialized by the program
    let Some(data) = data.filter(|d| !d.is_empty()) else {
        info!("record {} does not exist yet", record);
        return Ok(ItemListState::Absent);
    };

    let decoded = SharedRecord::decode(&data).map_err(|e| {
        warn!("record {} could not be decoded: {}", record, e);
        PortalError::ReadFailed(e.to_string())
    })?;
    info!("record {} holds {} items", record, decoded.gif_list.len());

    Ok(ItemListState::Populated(
        decoded.gif_list.into_iter().map(Item::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcError;
    use crate::testing::Harness;

    #[tokio::test]
    async fn missing_record_is_absent() {
        let h = Harness::new();
        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(state, ItemListState::Absent);
    }

    #[tokio::test]
    async fn stored_items_come_back_in_order() {
        let h = Harness::new();
        h.ledger.seed_record(&h.record.address(), &["a", "b", "a"], h.wallet.pubkey());

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        let links: Vec<String> = match state {
            ItemListState::Populated(items) => items.into_iter().map(|i| i.link).collect(),
            other => panic!("expected items, got {other:?}"),
        };
        assert_eq!(links, ["a", "b", "a"]);
    }

    #[tokio::test]
    async fn network_failure_is_distinct_from_absent() {
        let h = Harness::new();
        h.ledger
            .fail_next_read(RpcError::Transport("connection refused".to_string()));

        let err = fetch_items(&h.context(), &h.record.address()).await.unwrap_err();
        assert_eq!(
            err,
            PortalError::ReadFailed("transport error: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn foreign_data_is_a_read_failure() {
        let h = Harness::new();
        h.ledger.put_raw(&h.record.address(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);

        let err = fetch_items(&h.context(), &h.record.address()).await.unwrap_err();
        assert!(matches!(err, PortalError::ReadFailed(_)));
    }

    #[tokio::test]
    async fn empty_account_is_absent() {
        let h = Harness::new();
        h.ledger.put_raw(&h.record.address(), Vec::new());

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert!(state.is_absent());
    }
}
