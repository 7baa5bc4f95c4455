use crate::domain::PageFlags;

/// The single action area of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    ConnectWallet,
    Loading,
    StartPresale,
    PresaleNotStarted,
    PresaleMint,
    PublicMint,
}

impl PageView {
    pub fn label(self) -> &'static str {
        match self {
            PageView::ConnectWallet => "Connect your wallet",
            PageView::Loading => "Loading.........",
            PageView::StartPresale => "Start Presale!!",
            PageView::PresaleNotStarted => "Presale hasnt Started, check later!",
            PageView::PresaleMint => "Presale Mint",
            PageView::PublicMint => "Public Mint",
        }
    }
}

/// Priority order matters: the first matching rule wins.
pub fn select_view(flags: &PageFlags) -> PageView {
    if !flags.wallet_connected {
        PageView::ConnectWallet
    } else if flags.loading {
        PageView::Loading
    } else if flags.is_owner && !flags.presale_started() {
        PageView::StartPresale
    } else if !flags.presale_started() {
        PageView::PresaleNotStarted
    } else if !flags.presale_ended() {
        PageView::PresaleMint
    } else {
        PageView::PublicMint
    }
}

pub fn supply_line(flags: &PageFlags, max_supply: u64) -> String {
    format!("{}/{} have been minted", flags.tokens_minted, max_supply)
}
