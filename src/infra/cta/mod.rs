mod client;

pub use client::CtaWebClient;
