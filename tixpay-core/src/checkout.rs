//! Two-step checkout: cart review, then payment through the widget.

use std::time::Duration;

use smallvec::smallvec;
use tixpay_sdk::objects::{
    CartLineView, CartView, CheckoutStep, CheckoutView, CurrencyId, CurrencyList,
    PaymentWidgetProps, ZERO_ADDRESS,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cart::{CartStorage, CartStore};

/// Seller wallet the demo checkout pays into.
pub const DEMO_SELLER_ADDRESS: &str = "0xb07D2398d2004378cad234DA0EF14f1c94A530e4";

pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cannot proceed to payment with an empty cart")]
    EmptyCart,
}

/// Fixed parameters of the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub seller_address: String,
    pub supported_currencies: CurrencyList,
    pub builder_id: Option<String>,
    /// Where the visitor is sent after a successful payment.
    pub redirect_to: String,
    pub redirect_delay: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            seller_address: DEMO_SELLER_ADDRESS.to_owned(),
            supported_currencies: smallvec![
                CurrencyId::EthSepolia,
                CurrencyId::FakeUsdcSepolia,
                CurrencyId::FakeUsdtSepolia,
            ],
            builder_id: None,
            redirect_to: "/".to_owned(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

impl CheckoutSettings {
    /// Widget props charging the whole cart. The widget hides its own total
    /// since the order summary already shows it.
    pub fn checkout_widget_props<S>(&self, cart: &CartStore<S>) -> PaymentWidgetProps {
        PaymentWidgetProps {
            amount_in_usd: cart.total(),
            seller_address: self.seller_address.clone(),
            seller_info: None,
            buyer_info: None,
            product_info: None,
            supported_currencies: self.supported_currencies.clone(),
            invoice_number: None,
            fee_address: ZERO_ADDRESS.to_owned(),
            fee_amount_in_usd: rust_decimal::Decimal::ZERO,
            hide_total_amount: true,
            enable_buyer_info: true,
            builder_id: self.builder_id.clone(),
        }
    }

    /// Handle the widget's payment success signal.
    ///
    /// Clears the cart and schedules the redirect. Must be called within a
    /// Tokio runtime.
    pub fn on_payment_success<S: CartStorage>(&self, cart: &mut CartStore<S>) -> ScheduledRedirect {
        let cleared = cart.clear_tickets();
        info!(
            cleared,
            redirect_to = %self.redirect_to,
            delay_secs = self.redirect_delay.as_secs(),
            "Payment succeeded, cart cleared"
        );
        ScheduledRedirect::schedule(self.redirect_to.clone(), self.redirect_delay)
    }
}

/// Current cart as rendered by the review step and the order summary.
pub fn cart_view<S>(cart: &CartStore<S>) -> CartView {
    let items = cart
        .line_items_by_scope()
        .into_iter()
        .flat_map(|(event_id, lines)| {
            lines.into_iter().map(move |item| CartLineView {
                event_id: event_id.to_owned(),
                item: item.clone(),
                line_total: item.line_total(),
            })
        })
        .collect();
    CartView {
        items,
        total: cart.total(),
    }
}

// ---------------------------------------------------------------------------
// Stepper
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutStepper {
    step: CheckoutStep,
}

impl CheckoutStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn proceed_to_payment<S>(&mut self, cart: &CartStore<S>) -> Result<CheckoutStep, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.step = CheckoutStep::Payment;
        debug!(lines = cart.len(), "Checkout moved to payment");
        Ok(self.step)
    }

    pub fn back_to_cart(&mut self) -> CheckoutStep {
        self.step = CheckoutStep::Cart;
        self.step
    }

    /// Stepper state. Widget props are only attached on the payment step.
    pub fn view<S>(&self, cart: &CartStore<S>, settings: &CheckoutSettings) -> CheckoutView {
        CheckoutView {
            step: self.step,
            has_items: !cart.is_empty(),
            cart: cart_view(cart),
            widget: (self.step == CheckoutStep::Payment)
                .then(|| settings.checkout_widget_props(cart)),
        }
    }
}

// ---------------------------------------------------------------------------
// Redirect timer
// ---------------------------------------------------------------------------

/// Pending post-payment redirect.
///
/// The timer is aborted by [`ScheduledRedirect::cancel`] or when the value is
/// dropped.
#[derive(Debug)]
pub struct ScheduledRedirect {
    target: String,
    delay: Duration,
    task: JoinHandle<()>,
    fired: Option<oneshot::Receiver<()>>,
}

impl ScheduledRedirect {
    /// Start the timer. Must be called within a Tokio runtime.
    pub fn schedule(target: String, delay: Duration) -> Self {
        let (tx, rx) = oneshot::channel();
        let redirect_to = target.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(redirect_to = %redirect_to, "Redirecting after payment");
            // receiver gone means nobody waits for it
            let _ = tx.send(());
        });
        Self {
            target,
            delay,
            task,
            fired: Some(rx),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the redirect.
    ///
    /// Resolves to the target once the timer fires, or `None` if it was
    /// cancelled or has already been awaited.
    pub async fn fired(&mut self) -> Option<&str> {
        let rx = self.fired.take()?;
        rx.await.ok().map(|()| self.target.as_str())
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MemoryStorage;
    use crate::selection::{add_ticket, tests::event};
    use rust_decimal::Decimal;
    use tokio::sync::oneshot::error::TryRecvError;
    use tokio::time::Instant;

    fn filled_cart() -> CartStore<MemoryStorage> {
        let event = event("evt1");
        let mut cart = CartStore::open(MemoryStorage::new());
        add_ticket(&mut cart, &event, "ga").unwrap();
        add_ticket(&mut cart, &event, "ga").unwrap();
        add_ticket(&mut cart, &event, "vip").unwrap();
        cart
    }

    #[test]
    fn test_empty_cart_cannot_proceed() {
        let cart = CartStore::open(MemoryStorage::new());
        let mut stepper = CheckoutStepper::new();
        assert_eq!(stepper.proceed_to_payment(&cart), Err(CheckoutError::EmptyCart));
        assert_eq!(stepper.step(), CheckoutStep::Cart);
    }

    #[test]
    fn test_stepper_round_trip() {
        let cart = filled_cart();
        let settings = CheckoutSettings::default();
        let mut stepper = CheckoutStepper::new();

        let view = stepper.view(&cart, &settings);
        assert_eq!(view.step, CheckoutStep::Cart);
        assert!(view.has_items);
        assert!(view.widget.is_none());

        assert_eq!(stepper.proceed_to_payment(&cart), Ok(CheckoutStep::Payment));
        let view = stepper.view(&cart, &settings);
        let widget = view.widget.unwrap();
        assert_eq!(widget.amount_in_usd, Decimal::new(14950, 2));
        assert!(widget.hide_total_amount);

        assert_eq!(stepper.back_to_cart(), CheckoutStep::Cart);
    }

    #[test]
    fn test_cart_view_groups_by_event() {
        let cart = filled_cart();
        let view = cart_view(&cart);
        assert_eq!(view.items.len(), 2);
        assert!(view.items.iter().all(|line| line.event_id == "evt1"));
        assert_eq!(view.items[0].line_total, Decimal::from(50));
        assert_eq!(view.total, Decimal::new(14950, 2));
    }

    #[test]
    fn test_checkout_widget_props() {
        let cart = filled_cart();
        let props = CheckoutSettings::default().checkout_widget_props(&cart);
        assert_eq!(props.seller_address, DEMO_SELLER_ADDRESS);
        assert_eq!(
            props.supported_currencies.as_slice(),
            &[
                CurrencyId::EthSepolia,
                CurrencyId::FakeUsdcSepolia,
                CurrencyId::FakeUsdtSepolia
            ]
        );
        assert_eq!(props.fee_address, ZERO_ADDRESS);
        assert!(props.hide_total_amount);
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_success_clears_and_redirects() {
        let mut cart = filled_cart();
        let settings = CheckoutSettings::default();
        let start = Instant::now();

        let mut redirect = settings.on_payment_success(&mut cart);
        assert!(cart.is_empty());
        assert_eq!(redirect.target(), "/");
        assert_eq!(redirect.delay(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(redirect.is_pending());

        assert_eq!(redirect.fired().await, Some("/"));
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(redirect.fired().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_redirect_never_fires() {
        let mut redirect = ScheduledRedirect::schedule("/".to_string(), Duration::from_secs(5));
        redirect.cancel();
        assert_eq!(redirect.fired().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_redirect_never_fires() {
        let mut redirect = ScheduledRedirect::schedule("/".to_string(), Duration::from_secs(5));
        let mut fired = redirect.fired.take().unwrap();
        drop(redirect);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.try_recv(), Err(TryRecvError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_payment_success_replaces_pending_redirect() {
        let mut cart = filled_cart();
        let settings = CheckoutSettings::default();

        let mut first = settings.on_payment_success(&mut cart);
        let mut first_fired = first.fired.take().unwrap();
        let mut pending = Some(first);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let replaced = pending.replace(settings.on_payment_success(&mut cart));
        assert!(replaced.is_some_and(|previous| previous.is_pending()));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(first_fired.try_recv(), Err(TryRecvError::Closed));

        let mut second = pending.unwrap();
        assert!(!second.is_pending());
        assert_eq!(second.fired().await, Some("/"));
    }
}
