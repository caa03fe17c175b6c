use std::fmt::Write as _;

use anchor_client::solana_sdk::native_token::LAMPORTS_PER_SOL;

use crate::error::ClientError;
use crate::view::AuctionView;

pub const TITLE: &str = "Dutch Auction";
pub const CONNECT_LABEL: &str = "Connect";
pub const BUY_LABEL: &str = "Buy Now!";
pub const SOLD_LABEL: &str = "NFT Sold";
pub const NOT_CONNECTED: &str = "Not connected";

/// Lamports as an exact SOL decimal: `1.0`, `1.5`, `0.000000001`
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return format!("{whole}.0");
    }
    let digits = format!("{fraction:09}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Text rendering of the current view
pub fn render(view: &AuctionView) -> String {
    let mut out = String::new();
    let connected = match view {
        AuctionView::Connected(connected) => connected,
        AuctionView::Disconnected => {
            let _ = writeln!(out, "{TITLE}    [{CONNECT_LABEL}]");
            let _ = writeln!(out, "{NOT_CONNECTED}");
            return out;
        }
    };

    let _ = writeln!(out, "{TITLE}    [{}]", connected.short_address());
    match &connected.metadata {
        Some(metadata) => {
            let _ = writeln!(out, "{}", metadata.name);
            let _ = writeln!(out, "{}", metadata.image);
            let _ = writeln!(out, "{}", metadata.description);
        }
        None => {
            let _ = writeln!(out, "(metadata unavailable)");
        }
    }

    match connected.price {
        Some(price) => {
            let _ = writeln!(out, "Price: {} SOL", format_sol(price));
        }
        None => {
            let _ = writeln!(out, "Price: loading...");
        }
    }

    let action = if connected.sold { SOLD_LABEL } else { BUY_LABEL };
    let _ = writeln!(out, "[{action}]");
    out
}

/// User-facing message for a failed action
pub fn notify(err: &ClientError) -> String {
    format!("Error: {err}")
}
