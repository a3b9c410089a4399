//! Shipping charge calculation for order drafts

use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::domain::merchant::MerchantSpecs;
use crate::domain::{
    ChargeBreakdown, ChargeType, City, DataStore, DeliveryMode, DomainError, DomainResult, Entity,
    Merchant, MerchantCityPrice, OrderDraft, Repository, Specification, Standard, StoredIn,
    UnitOfWork,
};
use crate::shared::errors::ChargeCalculationError;

/// Prices order drafts from the pricing facts visible through one unit of work.
///
/// The charge is, in order:
/// 1. the merchant's special price for the city, else the city's charge price
/// 2. the village surcharge when the order ships to a village
/// 3. the overweight fee above the standard weight (exclusive)
/// 4. for merchant pickups, the merchant's pickup price, else the city's
/// 5. the charge type's extra price
///
/// `Standard`, the charge type and, when it is needed, the city must exist.
/// A negative weight is rejected before any lookup.
pub struct ShippingChargeService<'a, S: DataStore> {
    uow: &'a UnitOfWork<S>,
}

impl<'a, S> ShippingChargeService<'a, S>
where
    S: DataStore,
    Standard: StoredIn<S>,
    City: StoredIn<S>,
    Merchant: StoredIn<S>,
    MerchantCityPrice: StoredIn<S>,
    ChargeType: StoredIn<S>,
{
    pub fn new(uow: &'a UnitOfWork<S>) -> Self {
        Self { uow }
    }

    /// Total shipping charge for `draft`.
    pub async fn calculate_charge(&self, draft: &OrderDraft) -> Result<Decimal, ChargeCalculationError> {
        Ok(self.calculate_breakdown(draft).await?.total)
    }

    /// Shipping charge for `draft` with each component listed.
    pub async fn calculate_breakdown(
        &self,
        draft: &OrderDraft,
    ) -> Result<ChargeBreakdown, ChargeCalculationError> {
        match self.price(draft).await {
            Ok(breakdown) => {
                metrics::counter!("shipping_charge_calculations_total", "outcome" => "ok")
                    .increment(1);
                info!(
                    city_id = draft.city_id,
                    merchant_id = draft.merchant_id,
                    charge_type_id = draft.charge_type_id,
                    total = %breakdown.total,
                    "Shipping charge calculated"
                );
                Ok(breakdown)
            }
            Err(cause) => {
                metrics::counter!("shipping_charge_calculations_total", "outcome" => "error")
                    .increment(1);
                error!(
                    city_id = draft.city_id,
                    merchant_id = draft.merchant_id,
                    charge_type_id = draft.charge_type_id,
                    error = %cause,
                    retryable = cause.is_transient(),
                    "Shipping charge calculation failed"
                );
                Err(ChargeCalculationError::new(cause))
            }
        }
    }

    async fn price(&self, draft: &OrderDraft) -> DomainResult<ChargeBreakdown> {
        if draft.total_weight < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "total weight must not be negative, got {}",
                draft.total_weight
            )));
        }

        let standard = self
            .uow
            .repository::<Standard>()?
            .first_matching(&Specification::new())
            .await?
            .ok_or_else(|| DomainError::not_found(Standard::NAME, "id", "any"))?;

        // loaded at most once, only if a city price is needed
        let mut city: Option<City> = None;

        let special = self
            .uow
            .repository::<MerchantCityPrice>()?
            .first_matching(&MerchantSpecs::special_price(draft.merchant_id, draft.city_id))
            .await?;
        let base_price = match special {
            Some(row) => {
                debug!(
                    merchant_id = draft.merchant_id,
                    city_id = draft.city_id,
                    "Using merchant special price"
                );
                row.special_price
            }
            None => {
                let found = self.city(draft.city_id).await?;
                let price = found.charge_price;
                city = Some(found);
                price
            }
        };

        let village_fee = if draft.ships_to_village {
            standard.village_price
        } else {
            Decimal::ZERO
        };
        let overweight_fee = standard.overweight_fee(draft.total_weight);

        let pickup_fee = match draft.delivery_mode {
            DeliveryMode::BranchDelivery => Decimal::ZERO,
            DeliveryMode::MerchantPickup => {
                let merchant = self
                    .uow
                    .repository::<Merchant>()?
                    .find_by_id(&draft.merchant_id)
                    .await?;
                match merchant.and_then(|m| m.special_pickup_price) {
                    Some(price) => price,
                    None => match city {
                        Some(ref c) => c.pickup_price,
                        None => self.city(draft.city_id).await?.pickup_price,
                    },
                }
            }
        };

        let charge_type = self
            .uow
            .repository::<ChargeType>()?
            .find_by_id(&draft.charge_type_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ChargeType::NAME, "id", draft.charge_type_id))?;

        Ok(ChargeBreakdown::new(
            base_price,
            village_fee,
            overweight_fee,
            pickup_fee,
            charge_type.extra_price,
        ))
    }

    async fn city(&self, id: i32) -> DomainResult<City> {
        self.uow
            .repository::<City>()?
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(City::NAME, "id", id))
    }
}
