//! Mutations of the shared record. Every write is built, signed by the
//! connected wallet, submitted, and then polled until the cluster reports it
//! at the context's commitment level. Writes never return the new list;
//! callers re-read.

use std::time::Duration;

use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::compat;
use crate::context::RemoteContext;
use crate::error::PortalError;
use crate::events::WriteKind;
use crate::keypair::RecordKeypair;
use crate::keypair::SharedRecordRef;
use crate::pubkey::Signature;
use crate::rpc::RpcError;
use crate::transaction::Instruction;
use crate::transaction::Message;
use crate::transaction::Transaction;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Creates the shared record.
///
/// The ledger refuses to create an account twice, which surfaces here as
/// [`PortalError::AlreadyInitialized`]. Concurrent callers race at the ledger.
pub async fn initialize_record(
    ctx: &RemoteContext,
    record: &SharedRecordRef,
) -> Result<(), PortalError> {
    let instruction = ctx.program().initialize(&record.address(), &ctx.signer());
    let signature = submit(ctx, instruction, Some(record.keypair()), WriteKind::Initialize).await?;
    info!("record {} initialized in {}", record.address(), signature);
    Ok(())
}

/// Appends `link` to the shared record.
///
/// Empty links are refused before anything is sent.
pub async fn append_item(
    ctx: &RemoteContext,
    record: &SharedRecordRef,
    link: &str,
) -> Result<(), PortalError> {
    let link = validate_link(link)?;
    let instruction = ctx
        .program()
        .append_item(&record.address(), &ctx.signer(), link);
    let signature = submit(ctx, instruction, None, WriteKind::Append).await?;
    info!("appended {} to record {} in {}", link, record.address(), signature);
    Ok(())
}

/// Trims `link`, rejecting it if nothing is left.
pub fn validate_link(link: &str) -> Result<&str, PortalError> {
    match link.trim() {
        "" => Err(PortalError::EmptyLink),
        trimmed => Ok(trimmed),
    }
}

async fn submit(
    ctx: &RemoteContext,
    instruction: Instruction,
    co_signer: Option<&RecordKeypair>,
    kind: WriteKind,
) -> Result<Signature, PortalError> {
    let blockhash = ctx
        .rpc()
        .latest_blockhash(ctx.commitment())
        .await
        .map_err(|e| classify(kind, e))?;

    let message = Message::new(&[instruction], &ctx.signer(), blockhash);
    let message_bytes = message.serialize();
    let mut transaction = Transaction::new_unsigned(message);

    let wallet_signature = ctx
        .wallet()
        .sign_message(&message_bytes)
        .await
        .map_err(|e| PortalError::WriteFailed(format!("wallet did not sign: {e}")))?;
    transaction
        .add_signature(&ctx.signer(), wallet_signature)
        .map_err(|e| PortalError::WriteFailed(e.to_string()))?;
    if let Some(keypair) = co_signer {
        transaction
            .add_signature(&keypair.pubkey(), keypair.sign(&message_bytes))
            .map_err(|e| PortalError::WriteFailed(e.to_string()))?;
    }

    let signature = ctx
        .rpc()
        .send_transaction(&transaction, ctx.commitment())
        .await
        .map_err(|e| classify(kind, e))?;
    info!("{} submitted as {}", kind, signature);

    await_confirmation(ctx, &signature).await?;
    Ok(signature)
}

async fn await_confirmation(ctx: &RemoteContext, signature: &Signature) -> Result<(), PortalError> {
    let attempts = (ctx.confirm_timeout().as_millis() / CONFIRM_POLL_INTERVAL.as_millis()).max(1);

    for _ in 0..attempts {
        match ctx.rpc().signature_status(signature).await {
            Ok(Some(status)) => {
                if let Some(err) = status.err {
                    return Err(PortalError::WriteFailed(format!(
                        "transaction {signature} failed: {err}"
                    )));
                }
                if status
                    .confirmation
                    .is_some_and(|level| ctx.commitment().is_met_by(level))
                {
                    return Ok(());
                }
            }
            Ok(None) => {}
            // the transaction is already submitted, keep polling
            Err(e) => warn!("status poll for {} failed: {}", signature, e),
        }
        compat::sleep(CONFIRM_POLL_INTERVAL).await;
    }

    Err(PortalError::WriteFailed(format!(
        "transaction {} was not {} within {}s",
        signature,
        ctx.commitment(),
        ctx.confirm_timeout().as_secs()
    )))
}

/// Maps a ledger refusal onto the error the page reacts to.
fn classify(kind: WriteKind, err: RpcError) -> PortalError {
    warn!("{} failed: {}", kind, err);
    match kind {
        WriteKind::Initialize if err.mentions("already in use") => PortalError::AlreadyInitialized,
        // program error 3012 (0xbc4): the record account was never created
        WriteKind::Append if err.mentions("AccountNotInitialized") || err.mentions("0xbc4") => {
            PortalError::RecordNotFound
        }
        _ => PortalError::WriteFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{fetch_items, ItemListState};
    use crate::testing::{links, Harness};

    #[tokio::test]
    async fn fetch_before_initialize_is_absent() {
        let h = Harness::new();
        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(state, ItemListState::Absent);
    }

    #[tokio::test]
    async fn initialize_then_fetch_is_empty_list() {
        let h = Harness::new();
        initialize_record(&h.context(), &h.record).await.unwrap();

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(state, ItemListState::Populated(Vec::new()));
    }

    #[tokio::test]
    async fn second_initialize_is_already_initialized() {
        let h = Harness::new();
        initialize_record(&h.context(), &h.record).await.unwrap();

        let err = initialize_record(&h.context(), &h.record).await.unwrap_err();
        assert_eq!(err, PortalError::AlreadyInitialized);
        assert_eq!(h.ledger.record_count(), 1);
    }

    #[tokio::test]
    async fn appended_link_is_read_back() {
        let h = Harness::new();
        initialize_record(&h.context(), &h.record).await.unwrap();
        append_item(&h.context(), &h.record, "http://x/a.gif").await.unwrap();

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(links(&state), ["http://x/a.gif"]);
        if let ItemListState::Populated(items) = state {
            assert_eq!(items[0].submitted_by, h.wallet.pubkey());
        }
    }

    #[tokio::test]
    async fn append_keeps_order_and_duplicates() {
        let h = Harness::new();
        h.ledger
            .seed_record(&h.record.address(), &["a", "b"], h.wallet.pubkey());

        append_item(&h.context(), &h.record, "c").await.unwrap();
        append_item(&h.context(), &h.record, "a").await.unwrap();

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(links(&state), ["a", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn empty_link_never_reaches_the_network() {
        let h = Harness::new();
        initialize_record(&h.context(), &h.record).await.unwrap();
        let sent_before = h.ledger.rpc_calls();

        for link in ["", "   "] {
            let err = append_item(&h.context(), &h.record, link).await.unwrap_err();
            assert_eq!(err, PortalError::EmptyLink);
        }
        assert_eq!(h.ledger.rpc_calls(), sent_before);
        assert_eq!(h.wallet.sign_calls(), 1);
    }

    #[tokio::test]
    async fn append_is_trimmed() {
        let h = Harness::new();
        initialize_record(&h.context(), &h.record).await.unwrap();
        append_item(&h.context(), &h.record, "  http://x/b.gif \n").await.unwrap();

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(links(&state), ["http://x/b.gif"]);
    }

    #[tokio::test]
    async fn append_without_record_is_record_not_found() {
        let h = Harness::new();
        let err = append_item(&h.context(), &h.record, "http://x/a.gif")
            .await
            .unwrap_err();
        assert_eq!(err, PortalError::RecordNotFound);
    }

    #[tokio::test]
    async fn refused_signature_is_write_failure() {
        let h = Harness::with_wallet(crate::testing::TestWallet::refusing_to_sign());
        let err = initialize_record(&h.context(), &h.record).await.unwrap_err();
        assert!(matches!(err, PortalError::WriteFailed(_)));
        assert_eq!(h.ledger.record_count(), 0);
    }

    #[tokio::test]
    async fn unrelated_rejection_is_write_failure() {
        let h = Harness::new();
        h.ledger.fail_next_send(RpcError::Rpc {
            code: -32002,
            message: "Transaction simulation failed: Attempt to debit an account but found no record of a prior credit.".to_string(),
            logs: Vec::new(),
        });

        let err = initialize_record(&h.context(), &h.record).await.unwrap_err();
        assert!(matches!(err, PortalError::WriteFailed(msg) if msg.contains("prior credit")));
    }

    #[tokio::test]
    async fn failed_execution_is_reported() {
        let h = Harness::new();
        initialize_record(&h.context(), &h.record).await.unwrap();
        h.ledger.fail_next_execution("{\"InstructionError\":[0,\"ProgramFailedToComplete\"]}");

        let err = append_item(&h.context(), &h.record, "x").await.unwrap_err();
        assert!(matches!(err, PortalError::WriteFailed(msg) if msg.contains("ProgramFailedToComplete")));
    }

    #[tokio::test(start_paused = true)]
    async fn write_waits_for_requested_commitment() {
        let h = Harness::new();
        h.ledger.confirm_after_polls(2);
        initialize_record(&h.context(), &h.record).await.unwrap();

        let calls_before = h.ledger.rpc_calls();
        append_item(&h.context(), &h.record, "http://x/slow.gif").await.unwrap();
        // blockhash, send, then three status polls
        assert_eq!(h.ledger.rpc_calls() - calls_before, 5);

        let state = fetch_items(&h.context(), &h.record.address()).await.unwrap();
        assert_eq!(links(&state), ["http://x/slow.gif"]);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_write_times_out() {
        let h = Harness::new();
        h.ledger.never_confirm();

        let err = initialize_record(&h.context(), &h.record).await.unwrap_err();
        assert!(
            matches!(&err, PortalError::WriteFailed(msg) if msg.contains("was not confirmed within 2s")),
            "{err:?}"
        );
    }

    #[test]
    fn validate_link_trims() {
        assert_eq!(validate_link(" a "), Ok("a"));
        assert_eq!(validate_link("\t"), Err(PortalError::EmptyLink));
    }
}
