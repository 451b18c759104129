//! Constants Module - Single Source of Truth
//!
//! Every endpoint, default, registry entry and unit conversion used by the
//! engine is defined here. No hardcoded addresses in other modules.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "WalletTrace";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = "WalletTrace/0.1.0";

// ============================================
// UPSTREAM ENDPOINTS & LIMITS
// ============================================

/// Etherscan-compatible account/proxy API
pub const DEFAULT_ETHERSCAN_BASE_URL: &str = "https://api.etherscan.io/api";

/// blockchain.info-compatible raw address API
pub const DEFAULT_BLOCKCHAIN_INFO_BASE_URL: &str = "https://blockchain.info";

/// Timeout for chain-data provider requests (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for the sanctions oracle call (seconds)
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 15;

/// Maximum Ethereum transactions requested per scan (Etherscan page cap)
pub const DEFAULT_ETH_TX_CAP: u32 = 10_000;

/// Maximum Bitcoin transactions requested per scan
pub const DEFAULT_BTC_TX_LIMIT: u32 = 100;

/// Etherscan `endblock` covering the whole chain
pub const ETHERSCAN_END_BLOCK: u64 = 99_999_999;

// ============================================
// SANCTIONS ORACLE
// ============================================

/// Chainalysis sanctions oracle on Ethereum mainnet
pub const SANCTIONS_ORACLE_ADDRESS: &str = "0x40C57923924B5c5c5455c48D93317139ADDaC8fb";

// ============================================
// UNITS & FORMATTING
// ============================================

/// Wei per ETH exponent
pub const ETH_DECIMALS: u32 = 18;
/// Fractional digits shown for ETH amounts
pub const ETH_DISPLAY_PRECISION: u32 = 6;
/// Satoshi per BTC exponent
pub const BTC_DECIMALS: u32 = 8;
/// Fractional digits shown for BTC amounts
pub const BTC_DISPLAY_PRECISION: u32 = 8;

/// Timestamp rendering for first/last seen and interactions (UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// ============================================
// SCORING THRESHOLDS
// ============================================

/// Score at or above which a wallet is reported as traceable
pub const TRACEABLE_THRESHOLD: u8 = 40;

// ============================================
// CHAIN HINTS
// ============================================

/// Hints naming the Ethereum family
pub const ETHEREUM_HINTS: [&str; 2] = ["ethereum", "eth"];

/// Hints naming the Bitcoin family
pub const BITCOIN_HINTS: [&str; 2] = ["bitcoin", "btc"];

// ============================================
// EXCHANGE REGISTRY (ETH) - Etherscan labels, public documentation
// ============================================

/// Known custodial-exchange addresses on Ethereum mainnet
pub const KNOWN_EXCHANGES_ETH: &[(&str, &str)] = &[
    // Binance
    ("0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be", "Binance"),
    ("0xd551234ae421e3bcba99a0da6d736074f22192ff", "Binance"),
    ("0x564286362092d8e7936f0549571a803b203aaced", "Binance"),
    ("0x0681d8db095565fe8a346fa0277bffde9c0edbbf", "Binance"),
    ("0xfe9e8709d3215310075d67e3ed32a380ccf451c8", "Binance"),
    ("0x4e9ce36e442e55ecd9025b9a6e0d88485d628a67", "Binance"),
    ("0xbe0eb53f46cd790cd13851d5eff43d12404d33e8", "Binance"),
    ("0xf977814e90da44bfa03b6295a0616a897441acec", "Binance"),
    ("0x28c6c06298d514db089934071355e5743bf21d60", "Binance"),
    ("0x21a31ee1afc51d94c2efccaa2092ad1028285549", "Binance"),
    // Coinbase
    ("0x71660c4005ba85c37ccec55d0c4493e66fe775d3", "Coinbase"),
    ("0x503828976d22510aad0201ac7ec88293211571c7", "Coinbase"),
    ("0xddfabcdc4d8ffc6d5beaf154f18b778f892a0740", "Coinbase"),
    ("0x3cd751e6b0078be393132286c442345e68ff0aaa", "Coinbase"),
    ("0xb5d85cbf7cb3ee0d56b3bb207d5fc4b82f43f511", "Coinbase"),
    ("0xeb2629a2734e272bcc07bda959863f316f4bd4cf", "Coinbase"),
    ("0xa9d1e08c7793af67e9d92fe308d5697fb81d3e43", "Coinbase"),
    // Kraken
    ("0x267be1c1d684f78cb4f6a176c4911b741e4ffdc0", "Kraken"),
    ("0x53d284357ec70ce289d6d64134dfac8e511c8a3d", "Kraken"),
    ("0x2910543af39aba0cd09dbb2d50200b3e800a63d2", "Kraken"),
    ("0x0a869d79a7052c7f1b55a8ebabbea3420f0d1e13", "Kraken"),
    // OKX
    ("0x6cc5f688a315f3dc28a7781717a9a798a59fda7b", "OKX"),
    ("0x236f9f97e0e62388479bf9e5ba4889e46b0273c3", "OKX"),
    ("0xa7efae728d2936e78bda97dc267687568dd593f3", "OKX"),
    ("0x5041ed759dd4afc3a72b8192c143f72f4724081a", "OKX"),
    // Huobi (HTX)
    ("0xab5c66752a9e8167967685f1450532fb96d5d24f", "Huobi"),
    ("0x6748f50f686bfbca6fe8ad62b22228b87f31ff2b", "Huobi"),
    ("0xfdb16996831753d5331ff813c29a93c76834a0ad", "Huobi"),
    ("0xeee28d484628d41a82d01a21dc91b1cdaf45c5b5", "Huobi"),
    ("0x5c985e89dde482efe97ea9f1950ad149eb73829b", "Huobi"),
    // Bitfinex
    ("0x876eabf441b2ee5b5b0554fd502a8e0600950cfa", "Bitfinex"),
    ("0xc6cde7c39eb2f0f0095f41570af89efc2c1ea828", "Bitfinex"),
    ("0x742d35cc6634c0532925a3b844bc9e7595f2bd33", "Bitfinex"),
    // Gate.io
    ("0x0d0707963952f2fba59dd06f2b425ace40b492fe", "Gate.io"),
    ("0x1c4b70a3968436b9a0a9cf5205c787eb81bb558c", "Gate.io"),
    ("0xd793281b45ce0ea2e5e5b0c72bed98cb8426cf8b", "Gate.io"),
    // Crypto.com
    ("0x6262998ced04146fa42253a5c0af90ca02dfd2a3", "Crypto.com"),
    ("0x46340b20830761efd32832a74d7169b29feb9758", "Crypto.com"),
    // Bybit
    ("0xf89d7b9c864f589bbf53a82105107622b35eaa40", "Bybit"),
    ("0xa7a93fd0a276fc1c0197a5b5623ed117786bac38", "Bybit"),
    // KuCoin
    ("0x2b5634c42055806a59e9107ed44d43c426e58258", "KuCoin"),
    ("0x689c56aef474df92d44a1b70850f808488f9769c", "KuCoin"),
    ("0xa1d8d972560c2f8144af871db508f0b0b10a3fbf", "KuCoin"),
    // Gemini
    ("0xd24400ae8bfebb18ca49be86258a3c749cf46853", "Gemini"),
    ("0x6fc82a5fe25a5cdb58bc74600a40a69c065263f8", "Gemini"),
    // Bitstamp
    ("0x00bdb5699745f5b860228c8f939abf1b9ae374ed", "Bitstamp"),
    ("0x1522900b6dafac587d499a862861c0869be6e428", "Bitstamp"),
];

// ============================================
// EXCHANGE REGISTRY (BTC)
// ============================================

/// Known custodial-exchange addresses on Bitcoin mainnet
pub const KNOWN_EXCHANGES_BTC: &[(&str, &str)] = &[
    // Binance
    ("34xp4vRoCGJym3xR7yCVPFHoCNxv4Twseo", "Binance"),
    ("3JZq4atUahhuA9rLhXLMhhTo133J9rF97j", "Binance"),
    ("bc1qm34lsc65zpw79lxes69zkqmk6ee3ewf0j77s3", "Binance"),
    // Coinbase
    ("3Kzh9qAqVWQhEsfQz7zEQL1EuSx5tyNLNS", "Coinbase"),
    ("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", "Coinbase"),
    ("3LYJfcfHPXYJreMsASk2jkn69LWEYKzexb", "Coinbase"),
    // Kraken
    ("3AfwAkvVDvbj5G3e2rCaDHgNLqf4q7hKqo", "Kraken"),
    ("bc1qr4dl5wa7kl8yu792dceg9z5knl2gkn220lk7a9", "Kraken"),
    // Bitfinex
    ("3D2oetdNuZUqQHPJmcMDDHYoqkyNVsFk9r", "Bitfinex"),
    ("bc1qgdjqv0av3q56jvd82tkdjpy7gdp9ut8tlqmgrpmv24sq90ecnvqqjwvw97", "Bitfinex"),
    // Bitstamp
    ("3P3QsMVK89JBNqZQv5zMAKG8FK3kJM4rjt", "Bitstamp"),
    // OKX
    ("bc1q2s3rjwvam9dt2ftt4sqxqjf3twav0gdx0k0q2etjz", "OKX"),
];

// ============================================
// MIXER REGISTRY (ETH only)
// ============================================

/// Tornado Cash pools, router, governance and relayer contracts
pub const KNOWN_MIXERS_ETH: &[(&str, &str)] = &[
    ("0x12d66f87a04a9e220743712ce6d9bb1b5616b8fc", "Tornado Cash 0.1 ETH"),
    ("0x47ce0c6ed5b0ce3d3a51fdb1c52dc66a7c3c2936", "Tornado Cash 1 ETH"),
    ("0x910cbd523d972eb0a6f4cae4618ad62622b39dbf", "Tornado Cash 10 ETH"),
    ("0xa160cdab225685da1d56aa342ad8841c3b53f291", "Tornado Cash 100 ETH"),
    ("0xd4b88df4d29f5cedd6857912842cff3b20c8cfa3", "Tornado Cash 100 ETH (old)"),
    ("0xfd8610d20aa15b7b2e3be39b396a1bc3516c7144", "Tornado Cash 100 ETH (old2)"),
    ("0x722122df12d4e14e13ac3b6895a86e84145b6967", "Tornado Cash Router"),
    ("0xd90e2f925da726b50c4ed8d0fb90ad053324f31b", "Tornado Cash Governance"),
    ("0x905b63fff465b9ffbf41dea908ceb12cd9f0d1ac", "Tornado Cash Mining"),
    ("0x178169b423a011fff22b9e3f3abea13414ddd0f1", "Tornado Cash Relayer"),
    ("0x610b717796ad172b316836ac95a2ffad065ceab4", "Tornado Cash Relayer 2"),
    ("0xbb93e510bbcd0b7beb5a853875f9ec60275cf498", "Tornado Cash Relayer 3"),
];

// ============================================
// CONVERSION UTILITIES - Single Source of Truth
// ============================================

/// Render a smallest-unit integer as a fixed-precision decimal string.
/// Rounds half-up at the last displayed digit. `precision` must not exceed `decimals`.
pub fn format_units(raw: U256, decimals: u32, precision: u32) -> String {
    let precision = precision.min(decimals);
    let ten = U256::from(10u64);

    let step = ten.pow(U256::from(decimals - precision));
    let half = step / U256::from(2u64);
    let scaled = raw.saturating_add(half) / step;

    if precision == 0 {
        return scaled.to_string();
    }

    let base = ten.pow(U256::from(precision));
    let whole = scaled / base;
    let frac = scaled % base;

    format!("{}.{:0>width$}", whole, frac.to_string(), width = precision as usize)
}

/// Convert wei to a display string, e.g. `"1.500000 ETH"`
#[inline]
pub fn format_wei(wei: U256) -> String {
    format!("{} ETH", format_units(wei, ETH_DECIMALS, ETH_DISPLAY_PRECISION))
}

/// Convert satoshi to a display string, e.g. `"0.00100000 BTC"`
#[inline]
pub fn format_satoshi(sat: u64) -> String {
    format!(
        "{} BTC",
        format_units(U256::from(sat), BTC_DECIMALS, BTC_DISPLAY_PRECISION)
    )
}

/// Unix seconds to UTC datetime. Out-of-range values yield None.
#[inline]
pub fn timestamp_from_secs(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

/// Render a timestamp for scan output
#[inline]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Check if a hint names the Ethereum family
pub fn is_ethereum_hint(hint: &str) -> bool {
    ETHEREUM_HINTS.contains(&hint.trim().to_lowercase().as_str())
}

/// Check if a hint names the Bitcoin family
pub fn is_bitcoin_hint(hint: &str) -> bool {
    BITCOIN_HINTS.contains(&hint.trim().to_lowercase().as_str())
}
