mod helpers;
mod mocks;

mod certificates;
mod healthcheck;
mod misc;
mod validated_orders;
