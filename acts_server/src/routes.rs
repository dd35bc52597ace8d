//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! the marketplace calls made by the sync trigger) must be expressed as futures or asynchronous functions.
use actix_web::{get, web, HttpResponse, Responder};
use acts_engine::{
    marketplace::DocumentSource,
    traits::ValidatedOrderFilter,
    CertificateManagement,
    CertificateSyncApi,
    CredentialSource,
    HealthcheckApi,
    HealthcheckManagement,
    OrderValidationApi,
    ReconciliationManagement,
};
use chrono::Utc;
use log::*;

use crate::{
    data_objects::{Banner, DataResponse, JsonResponse, ValidatedOrderQuery},
    errors::ServerError,
};

/// The account credential provider shared by every handler that acts on behalf of the seller accounts.
pub type Credentials = dyn CredentialSource + Send + Sync;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
//
// * `impl A, B` gives the handler one type parameter per bound, in order.
// * `where A, B` gives the handler a single type parameter that satisfies every bound.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal where $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(Banner::default())
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Trigger  ----------------------------------------------------
route!(update_acceptance_certificates => Post "/handle_trigger/update_acceptance_certificates" impl CertificateManagement, DocumentSource);
/// Runs the certificate sync for yesterday's certificates immediately, for every configured account.
///
/// Accounts that fail are logged and reported in the server log; the call only fails if the credentials cannot be
/// loaded or the certificates cannot be stored.
pub async fn update_acceptance_certificates<B, S>(
    api: web::Data<CertificateSyncApi<B, S>>,
    credentials: web::Data<Credentials>,
) -> Result<HttpResponse, ServerError>
where
    B: CertificateManagement,
    S: DocumentSource,
{
    info!("💻️ Certificate sync triggered");
    let accounts = credentials.load_credentials()?;
    let report = api.sync_update_certificates(&accounts, Utc::now().date_naive()).await?;
    info!(
        "💻️ Triggered sync stored {} new certificate lines. Failed accounts: {:?}",
        report.records_inserted,
        report.failed_accounts()
    );
    Ok(HttpResponse::Ok().json(JsonResponse::new(201, "database updated")))
}

//----------------------------------------------   Healthcheck  ----------------------------------------------------
route!(healthcheck_status => Get "/healthcheck/status" impl HealthcheckManagement);
pub async fn healthcheck_status<B: HealthcheckManagement>(
    api: web::Data<HealthcheckApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET healthcheck status");
    let statuses = api.statuses().await?;
    Ok(HttpResponse::Ok().json(DataResponse::ok(statuses)))
}

//----------------------------------------------   Validated orders  ----------------------------------------------
route!(validated_orders => Get "/validated_order" impl ReconciliationManagement);
/// The validated order report: internal orders with their latest status and the certificate line confirming them.
///
/// Query parameters: `begin_date`, `end_date` (certificate date bounds, `YYYY-MM-DD`), `order_id`, `supply_id`,
/// `account`, `page` (from 1) and `page_size` (default 200).
pub async fn validated_orders<B: ReconciliationManagement>(
    query: web::Query<ValidatedOrderQuery>,
    api: web::Data<OrderValidationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let filter = ValidatedOrderFilter::try_from(query.into_inner())?;
    debug!("💻️ GET validated orders for {filter:?}");
    let orders = api.validated_orders(&filter, Utc::now().date_naive()).await.map_err(|e| {
        debug!("💻️ Could not fetch validated orders. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(validation_status => Get "/validated_order/status" where CertificateManagement, ReconciliationManagement);
/// Reconciles yesterday's certificates for every configured account and returns one result per certificate.
pub async fn validation_status<B>(
    api: web::Data<OrderValidationApi<B>>,
    credentials: web::Data<Credentials>,
) -> Result<HttpResponse, ServerError>
where
    B: CertificateManagement + ReconciliationManagement,
{
    debug!("💻️ GET validation status");
    let accounts = credentials.load_credentials()?;
    let results = api.validate_orders(&accounts, Utc::now().date_naive()).await;
    Ok(HttpResponse::Ok().json(results))
}
