pub mod cart;
pub mod catalog;
pub mod currencies;
pub mod playground;
pub mod storefront;
pub mod widget;

pub use cart::{CartKey, CartLineItem, KEY_SEPARATOR};
pub use catalog::{Coordinates, Event, EventSummary, Location, Organizer, TicketTier};
pub use currencies::{CurrencyId, CurrencyOption, UnknownCurrency};
pub use playground::{PlaygroundReport, ValidationErrors};
pub use storefront::{
    CartLineView, CartView, CheckoutStep, CheckoutView, PaymentSuccessView, SelectionView,
    TierSelection,
};
pub use widget::{
    BuyerInfo, ContactInfo, CurrencyList, PaymentWidgetProps, PostalAddress, ProductInfo,
    SellerInfo, ZERO_ADDRESS, is_unset_fee_address,
};
