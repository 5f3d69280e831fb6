pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod testing;
pub mod transport;

pub use aggregator::{sanitize_source_id, AggregateError, Aggregator};
pub use catalog::{
    decode_episodes, decode_play_tracks, decode_record, CatalogError, Episode, MergedCatalog,
    SourceCatalog, VideoRecord,
};
pub use config::{
    load_config, load_config_from_str, load_sites, load_sites_from_str, validate_config, Config,
    ConfigError, FetcherConfig, PathsConfig, SanitizedConfig, ServerConfig, Site, SiteList,
    SitesError,
};
pub use transport::{FetchError, FetchResponse, HttpTransport, Transport};
