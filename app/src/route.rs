use dioxus::prelude::*;

use crate::pages::{Dashboard, Explorer, Home, Marketplace, Mint, MyNfts};
use crate::components::Layout;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    Home {},
    #[route("/mint")]
    Mint {},
    #[route("/marketplace")]
    Marketplace {},
    #[route("/my-nfts")]
    MyNfts {},
    #[route("/dashboard")]
    Dashboard {},  // subgraph stats, polled
    #[route("/explore")]
    Explorer {},
}
