use anchor_client::solana_sdk::pubkey::Pubkey;

use crate::metadata::ItemMetadata;

/// What the front end shows. Values are replaced wholesale, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuctionView {
    #[default]
    Disconnected,
    Connected(ConnectedView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedView {
    pub account: Pubkey,
    pub metadata: Option<ItemMetadata>,
    /// Last polled price; `None` until the first poll lands
    pub price: Option<u64>,
    pub sold: bool,
}

impl AuctionView {
    pub fn connected(account: Pubkey, metadata: Option<ItemMetadata>, sold: bool) -> Self {
        AuctionView::Connected(ConnectedView {
            account,
            metadata,
            price: None,
            sold,
        })
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, AuctionView::Connected(_))
    }

    pub fn price(&self) -> Option<u64> {
        match self {
            AuctionView::Connected(view) => view.price,
            AuctionView::Disconnected => None,
        }
    }

    /// Same view with a new price; a disconnected view stays as it is
    pub fn with_price(&self, price: u64) -> Self {
        match self {
            AuctionView::Connected(view) => AuctionView::Connected(ConnectedView {
                price: Some(price),
                ..view.clone()
            }),
            AuctionView::Disconnected => AuctionView::Disconnected,
        }
    }

    pub fn with_sold(&self, sold: bool) -> Self {
        match self {
            AuctionView::Connected(view) => AuctionView::Connected(ConnectedView {
                sold,
                ..view.clone()
            }),
            AuctionView::Disconnected => AuctionView::Disconnected,
        }
    }

    pub fn with_state(&self, metadata: Option<ItemMetadata>, sold: bool) -> Self {
        match self {
            AuctionView::Connected(view) => AuctionView::Connected(ConnectedView {
                metadata,
                sold,
                ..view.clone()
            }),
            AuctionView::Disconnected => AuctionView::Disconnected,
        }
    }
}

impl ConnectedView {
    /// `AbCdE...vWxYz` form of the account
    pub fn short_address(&self) -> String {
        let address = self.account.to_string();
        let chars: Vec<char> = address.chars().collect();
        if chars.len() <= 10 {
            return address;
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_replace_only_their_field() {
        let account = Pubkey::new_unique();
        let view = AuctionView::connected(account, None, false);

        let priced = view.with_price(42);
        assert_eq!(priced.price(), Some(42));
        assert_eq!(view.price(), None);

        let sold = priced.with_sold(true);
        match sold {
            AuctionView::Connected(inner) => {
                assert!(inner.sold);
                assert_eq!(inner.price, Some(42));
                assert_eq!(inner.account, account);
            }
            AuctionView::Disconnected => panic!("expected connected view"),
        }
    }

    #[test]
    fn disconnected_ignores_updates() {
        let view = AuctionView::Disconnected;
        assert_eq!(view.with_price(1), AuctionView::Disconnected);
        assert_eq!(view.with_sold(true), AuctionView::Disconnected);
        assert!(!view.is_connected());
    }

    #[test]
    fn short_address_keeps_five_characters_each_side() {
        let account = Pubkey::new_unique();
        let view = ConnectedView {
            account,
            metadata: None,
            price: None,
            sold: false,
        };
        let full = account.to_string();
        let short = view.short_address();
        assert_eq!(short.len(), 13);
        assert!(short.starts_with(&full[..5]));
        assert!(short.ends_with(&full[full.len() - 5..]));
    }
}
