// --- File: crates/services/roofline_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! This module provides an implementation of the ServiceFactory trait for the
//! backend service. It initializes the upstream CRM clients once, based on the
//! application configuration and runtime flags, and hands them out as trait
//! objects so every feature router shares the same authenticated capability.

use roofline_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

use roofline_common::is_feature_enabled;
use roofline_common::services::{
    BoxFuture, BoxedError, CrmService, Inspection, Lead, SchedulingService, ServiceFactory,
};
#[cfg(feature = "scheduling")]
use roofline_common::services::{
    BookingRecord, CancelBookingRequest, CreateBookingRequest, RescheduleBookingRequest,
    SlotQuery, TimeSlot,
};
use roofline_crm::{CrmClient, CrmRecordService};

#[cfg(feature = "scheduling")]
use roofline_scheduling::CrmSchedulingService;

/// Adapter that erases a concrete scheduling service's error type behind
/// `BoxedError`, so routers can hold `dyn SchedulingService` objects.
#[cfg(feature = "scheduling")]
struct BoxedSchedulingService {
    inner: CrmSchedulingService,
}

#[cfg(feature = "scheduling")]
impl SchedulingService for BoxedSchedulingService {
    type Error = BoxedError;

    fn fetch_available_slots(&self, query: SlotQuery) -> BoxFuture<'_, Vec<TimeSlot>, Self::Error> {
        Box::pin(async move {
            self.inner
                .fetch_available_slots(query)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> BoxFuture<'_, BookingRecord, Self::Error> {
        Box::pin(async move {
            self.inner
                .create_booking(request)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn cancel_booking(&self, request: CancelBookingRequest) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.inner
                .cancel_booking(request)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn reschedule_booking(
        &self,
        request: RescheduleBookingRequest,
    ) -> BoxFuture<'_, BookingRecord, Self::Error> {
        Box::pin(async move {
            self.inner
                .reschedule_booking(request)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Same erasure for the CRM record service.
struct BoxedCrmService {
    inner: CrmRecordService,
}

impl CrmService for BoxedCrmService {
    type Error = BoxedError;

    fn get_lead(&self, lead_id: &str) -> BoxFuture<'_, Lead, Self::Error> {
        let lead_id = lead_id.to_string();
        Box::pin(async move {
            self.inner
                .get_lead(&lead_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn link_booking_to_lead(
        &self,
        lead_id: &str,
        booking_id: &str,
    ) -> BoxFuture<'_, (), Self::Error> {
        let lead_id = lead_id.to_string();
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            self.inner
                .link_booking_to_lead(&lead_id, &booking_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn get_inspection(&self, inspection_id: &str) -> BoxFuture<'_, Inspection, Self::Error> {
        let inspection_id = inspection_id.to_string();
        Box::pin(async move {
            self.inner
                .get_inspection(&inspection_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Service factory for the Roofline backend.
///
/// Initializes services based on the configuration and feature flags and makes
/// them available through the `ServiceFactory` trait methods.
pub struct RooflineServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    #[cfg(feature = "scheduling")]
    scheduling_service: Option<Arc<dyn SchedulingService<Error = BoxedError>>>,
    crm_service: Option<Arc<dyn CrmService<Error = BoxedError>>>,
}

impl RooflineServiceFactory {
    /// Create a new service factory.
    pub fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            config: config.clone(),
            #[cfg(feature = "scheduling")]
            scheduling_service: None,
            crm_service: None,
        };

        let crm_wanted = config.use_crm || config.use_scheduling;
        if is_feature_enabled(&config, crm_wanted, config.crm_api.as_ref()) {
            info!("ℹ️ Initializing CRM API client...");
            let crm_config = config.crm_api.as_ref().unwrap().clone();
            if crm_config.api_token.is_none() {
                warn!("CRM API token is not set; upstream calls will be rejected");
            }
            let client = Arc::new(CrmClient::new(crm_config));

            #[cfg(feature = "scheduling")]
            {
                factory.scheduling_service = Some(Arc::new(BoxedSchedulingService {
                    inner: CrmSchedulingService::new(client.clone()),
                }));
            }
            factory.crm_service = Some(Arc::new(BoxedCrmService {
                inner: CrmRecordService::new(client),
            }));
        }

        factory
    }
}

impl ServiceFactory for RooflineServiceFactory {
    fn scheduling_service(&self) -> Option<Arc<dyn SchedulingService<Error = BoxedError>>> {
        #[cfg(feature = "scheduling")]
        {
            self.scheduling_service.clone()
        }
        #[cfg(not(feature = "scheduling"))]
        {
            None
        }
    }

    fn crm_service(&self) -> Option<Arc<dyn CrmService<Error = BoxedError>>> {
        self.crm_service.clone()
    }
}
