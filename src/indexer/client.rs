//! HTTP client for the remote indexing service.
//!
//! Speaks the indexer's JSON API and converts its wire format into the
//! domain types of this crate. Action payloads arrive as one optional
//! field per action type; anything not modelled here becomes
//! [`ActionKind::Unknown`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::IndexerApi;
use crate::domain::{
    AccountAddress, Action, ActionKind, ActionStatus, Collectible, CollectibleAddress,
    CollectibleMetadata, Event, EventPage, TokenAddress,
};
use crate::error::ActivityError;

/// Indexer client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpIndexerClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpIndexerClient {
    /// Creates a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Internal`] if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ActivityError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| ActivityError::Internal(format!("invalid indexer base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ActivityError::Internal(format!(
                "indexer base URL cannot carry a path: {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ActivityError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// Dot segments are rejected: the URL parser drops them, which would
    /// silently address a different endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ActivityError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ActivityError::InvalidRequest(format!(
                "invalid path segment: {bad:?}"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ActivityError::Internal("indexer base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ActivityError> {
        let response = self.authorize(request).send().await?;
        decode(response).await
    }

    async fn events_page(
        &self,
        account: &AccountAddress,
        url: Url,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        tracing::debug!(url = %url, ?before_cursor, limit, "indexer page request");
        let mut request = self.client.get(url).query(&[("limit", limit)]);
        if let Some(cursor) = before_cursor {
            request = request.query(&[("before_lt", cursor)]);
        }
        let dto: AccountEventsDto = self.get_json(request).await?;
        Ok(dto.into_page(account, before_cursor))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ActivityError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ActivityError::IndexerStatus {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl IndexerApi for HttpIndexerClient {
    async fn account_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        let url = self.endpoint(&["v2", "accounts", account.as_str(), "events"])?;
        self.events_page(account, url, before_cursor, limit).await
    }

    async fn token_events(
        &self,
        account: &AccountAddress,
        token: &TokenAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        let url = self.endpoint(&[
            "v2",
            "accounts",
            account.as_str(),
            "jettons",
            token.as_str(),
            "history",
        ])?;
        self.events_page(account, url, before_cursor, limit).await
    }

    async fn account_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        let url = self.endpoint(&["v2", "accounts", account.as_str(), "events", event_id])?;
        tracing::debug!(url = %url, "indexer event request");
        let dto: AccountEventDto = self.get_json(self.client.get(url)).await?;
        Ok(dto.into_event(account))
    }

    async fn collectibles(
        &self,
        addresses: &[CollectibleAddress],
    ) -> Result<Vec<Collectible>, ActivityError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&["v2", "nfts", "_bulk"])?;
        let body = BulkRequestDto {
            account_ids: addresses,
        };
        tracing::debug!(url = %url, count = addresses.len(), "indexer collectible batch");
        let dto: NftItemsDto = self.get_json(self.client.post(url).json(&body)).await?;
        Ok(dto
            .nft_items
            .into_iter()
            .map(NftItemDto::into_collectible)
            .collect())
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BulkRequestDto<'a> {
    account_ids: &'a [CollectibleAddress],
}

#[derive(Debug, Deserialize)]
struct NftItemsDto {
    #[serde(default)]
    nft_items: Vec<NftItemDto>,
}

#[derive(Debug, Deserialize)]
struct AccountRefDto {
    address: String,
}

impl AccountRefDto {
    fn into_address(self) -> AccountAddress {
        AccountAddress::new(self.address)
    }
}

#[derive(Debug, Deserialize)]
struct AccountEventsDto {
    #[serde(default)]
    events: Vec<AccountEventDto>,
    #[serde(default)]
    next_from: i64,
}

impl AccountEventsDto {
    fn into_page(self, account: &AccountAddress, before_cursor: Option<i64>) -> EventPage {
        EventPage {
            account_address: account.clone(),
            events: self
                .events
                .into_iter()
                .map(|event| event.into_event(account))
                .collect(),
            start_cursor: before_cursor,
            next_cursor: self.next_from,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountEventDto {
    event_id: String,
    timestamp: i64,
    #[serde(default)]
    account: Option<AccountRefDto>,
    #[serde(default)]
    actions: Vec<ActionDto>,
    #[serde(default)]
    is_scam: bool,
    #[serde(default)]
    in_progress: bool,
    /// Net balance change; negative values are fees paid.
    #[serde(default)]
    extra: i64,
}

impl AccountEventDto {
    fn into_event(self, fallback_account: &AccountAddress) -> Event {
        let timestamp = chrono::DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default();
        let account_address = self
            .account
            .map_or_else(|| fallback_account.clone(), AccountRefDto::into_address);
        Event {
            id: self.event_id,
            timestamp,
            account_address,
            is_suspicious: self.is_scam,
            is_pending: self.in_progress,
            fee: self.extra.min(0).unsigned_abs().to_string(),
            actions: self.actions.into_iter().map(ActionDto::into_action).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct ActionDto {
    #[serde(default)]
    status: String,
    #[serde(default)]
    TonTransfer: Option<NativeTransferDto>,
    #[serde(default)]
    JettonTransfer: Option<TokenTransferDto>,
    #[serde(default)]
    NftItemTransfer: Option<NftTransferDto>,
    #[serde(default)]
    NftPurchase: Option<NftPurchaseDto>,
    #[serde(default)]
    SmartContractExec: Option<ContractExecDto>,
    #[serde(default)]
    JettonSwap: Option<SwapDto>,
}

impl ActionDto {
    fn into_action(self) -> Action {
        let status = if self.status.eq_ignore_ascii_case("failed") {
            ActionStatus::Failed
        } else {
            ActionStatus::Ok
        };
        let kind = if let Some(dto) = self.TonTransfer {
            ActionKind::NativeTransfer {
                sender: dto.sender.into_address(),
                recipient: dto.recipient.into_address(),
                amount: dto.amount.to_string(),
                comment: dto.comment,
            }
        } else if let Some(dto) = self.JettonTransfer {
            ActionKind::FungibleTokenTransfer {
                token: TokenAddress::new(dto.jetton.address),
                sender: dto.sender.map(AccountRefDto::into_address),
                recipient: dto.recipient.map(AccountRefDto::into_address),
                amount: dto.amount,
            }
        } else if let Some(dto) = self.NftItemTransfer {
            ActionKind::CollectibleTransfer {
                collectible: CollectibleAddress::new(dto.nft),
                sender: dto.sender.map(AccountRefDto::into_address),
                recipient: dto.recipient.map(AccountRefDto::into_address),
            }
        } else if let Some(dto) = self.NftPurchase {
            ActionKind::CollectiblePurchase {
                collectible: dto.nft.into_collectible(),
                buyer: dto.buyer.into_address(),
                seller: dto.seller.into_address(),
                price: dto.amount.value,
            }
        } else if let Some(dto) = self.SmartContractExec {
            ActionKind::ContractCall {
                contract: dto.contract.into_address(),
                operation: dto.operation,
            }
        } else if let Some(dto) = self.JettonSwap {
            ActionKind::Swap {
                dex: dto.dex,
                amount_in: dto.amount_in,
                amount_out: dto.amount_out,
            }
        } else {
            ActionKind::Unknown
        };
        Action { status, kind }
    }
}

#[derive(Debug, Deserialize)]
struct NativeTransferDto {
    sender: AccountRefDto,
    recipient: AccountRefDto,
    amount: i64,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenTransferDto {
    #[serde(default)]
    sender: Option<AccountRefDto>,
    #[serde(default)]
    recipient: Option<AccountRefDto>,
    amount: String,
    jetton: AccountRefDto,
}

#[derive(Debug, Deserialize)]
struct NftTransferDto {
    #[serde(default)]
    sender: Option<AccountRefDto>,
    #[serde(default)]
    recipient: Option<AccountRefDto>,
    nft: String,
}

#[derive(Debug, Deserialize)]
struct PriceDto {
    value: String,
}

#[derive(Debug, Deserialize)]
struct NftPurchaseDto {
    amount: PriceDto,
    buyer: AccountRefDto,
    seller: AccountRefDto,
    nft: NftItemDto,
}

#[derive(Debug, Deserialize)]
struct ContractExecDto {
    contract: AccountRefDto,
    #[serde(default)]
    operation: String,
}

#[derive(Debug, Deserialize)]
struct SwapDto {
    #[serde(default)]
    dex: String,
    #[serde(default)]
    amount_in: String,
    #[serde(default)]
    amount_out: String,
}

#[derive(Debug, Deserialize)]
struct CollectionDto {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NftItemDto {
    address: String,
    #[serde(default)]
    metadata: serde_json::Value,
    #[serde(default)]
    collection: Option<CollectionDto>,
}

impl NftItemDto {
    fn into_collectible(self) -> Collectible {
        let field = |key: &str| {
            self.metadata
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        let metadata = CollectibleMetadata {
            name: field("name"),
            image_url: field("image"),
            description: field("description"),
            collection_name: self.collection.and_then(|collection| collection.name),
        };
        Collectible {
            address: CollectibleAddress::new(self.address),
            metadata,
        }
    }
}
