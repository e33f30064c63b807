//! The acquisition task spawned by each `Start`.
//!
//! permission → high accuracy fix → low accuracy fix → watch. A refused permission ends
//! the attempt; a failed fix does not stop the watch from being installed. A watch that
//! cannot be installed ends the attempt too.

use super::actions::{FeedAction, FeedActionResult};
use super::FeedContext;
use crate::model::{Accuracy, LocationFault, Point};
use std::time::Duration;
use tracing::{debug, info};

pub(crate) async fn run(generation: u64, ctx: FeedContext) {
    if let Err(fault) = ctx.provider.request_permission().await {
        // However the provider failed, the attempt ends as a refusal.
        let fault = LocationFault::permission_denied(fault.detail);
        report(&ctx, FeedAction::Fault { generation, fault }).await;
        return;
    }

    let first = match first_fix(&ctx).await {
        Ok(point) => FeedAction::Fix { generation, point },
        Err(fault) => FeedAction::Fault { generation, fault },
    };
    if !report(&ctx, first).await {
        return;
    }

    let mut subscription = match ctx.provider.watch_position(Accuracy::High).await {
        Ok(subscription) => subscription,
        Err(fault) => {
            report(&ctx, FeedAction::WatchFailed { generation, fault }).await;
            return;
        }
    };
    let id = subscription.id;
    match ctx.this.perform_action(FeedAction::Watching { generation, id }).await {
        Ok(FeedActionResult::Applied(true)) => info!(%id, "Watching position"),
        // Superseded: the feed has already cleared it.
        Ok(_) => return,
        Err(_) => {
            ctx.provider.clear_watch(id);
            return;
        }
    }

    while let Some(event) = subscription.events.recv().await {
        let action = match event {
            Ok(point) => FeedAction::Fix { generation, point },
            Err(fault) => FeedAction::Fault { generation, fault },
        };
        if !report(&ctx, action).await {
            break;
        }
    }
    debug!(%id, "Watch ended");
}

async fn first_fix(ctx: &FeedContext) -> Result<Point, LocationFault> {
    match fix(ctx, Accuracy::High, ctx.high_accuracy_timeout).await {
        Ok(point) => Ok(point),
        Err(fault) => {
            debug!(%fault, "High accuracy fix failed, retrying with low accuracy");
            fix(ctx, Accuracy::Low, ctx.low_accuracy_timeout).await
        }
    }
}

async fn fix(ctx: &FeedContext, accuracy: Accuracy, limit: Duration) -> Result<Point, LocationFault> {
    match tokio::time::timeout(limit, ctx.provider.current_position(accuracy, limit)).await {
        Ok(result) => result,
        Err(_) => Err(LocationFault::timeout(format!(
            "no {} accuracy fix within {}s",
            match accuracy {
                Accuracy::High => "high",
                Accuracy::Low => "low",
            },
            limit.as_secs()
        ))),
    }
}

async fn report(ctx: &FeedContext, action: FeedAction) -> bool {
    matches!(
        ctx.this.perform_action(action).await,
        Ok(FeedActionResult::Applied(true))
    )
}
