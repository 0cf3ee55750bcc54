//! Solidity interfaces of the NFT collection and the marketplace.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

sol! {
    /// One entry of the marketplace's listing array; its index is the listing id.
    #[derive(Debug, PartialEq, Eq)]
    struct Listing {
        address seller;
        address nftAddress;
        uint256 tokenId;
        uint256 price;
        bool isSold;
    }

    /// The ERC-721 collection minted through the marketplace front-end.
    #[derive(Debug)]
    interface INftCollection {
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);

        function tokenCounter() external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function approve(address to, uint256 tokenId) external;
        function mintNFT(address recipient, string memory tokenURI) external returns (uint256);
    }

    /// The fixed-price marketplace.
    #[derive(Debug)]
    interface IMarketplace {
        function getListings() external view returns (Listing[] memory);
        function listNFT(address nftAddress, uint256 tokenId, uint256 price) external;
        function buyNFT(uint256 listingId) external payable;
        function calculateFee(uint256 price) external view returns (uint256);
    }
}

/// An unsigned transaction, handed to whichever signer is available.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl TxRequest {
    fn call<C: SolCall>(from: Address, to: Address, call: &C) -> Self {
        Self {
            from,
            to,
            data: call.abi_encode().into(),
            value: U256::ZERO,
        }
    }

    pub fn mint(from: Address, collection: Address, recipient: Address, token_uri: String) -> Self {
        Self::call(
            from,
            collection,
            &INftCollection::mintNFTCall {
                recipient,
                tokenURI: token_uri,
            },
        )
    }

    pub fn approve(from: Address, collection: Address, spender: Address, token_id: U256) -> Self {
        Self::call(
            from,
            collection,
            &INftCollection::approveCall {
                to: spender,
                tokenId: token_id,
            },
        )
    }

    pub fn list(
        from: Address,
        marketplace: Address,
        collection: Address,
        token_id: U256,
        price: U256,
    ) -> Self {
        Self::call(
            from,
            marketplace,
            &IMarketplace::listNFTCall {
                nftAddress: collection,
                tokenId: token_id,
                price,
            },
        )
    }

    /// Buying is payable; the value sent is the listing price.
    pub fn buy(from: Address, marketplace: Address, listing_id: U256, price: U256) -> Self {
        let mut tx = Self::call(
            from,
            marketplace,
            &IMarketplace::buyNFTCall {
                listingId: listing_id,
            },
        );
        tx.value = price;
        tx
    }
}
