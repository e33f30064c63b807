//! The spawned half of a trace: resolve, validate, route, stream.
//!
//! The pipeline never touches session state. Each stage is reported to the session
//! actor; a report answered with `Applied(false)` means a newer trace took over and the
//! pipeline stops.

use super::actions::{TraceAction, TraceActionResult};
use super::error::TraceError;
use super::TraceContext;
use crate::model::{Point, PointSource, RouteRequest, TraceRequest, TraceResult};
use tracing::debug;

pub(crate) async fn run(seq: u64, request: TraceRequest, ctx: TraceContext) {
    if let Err(error) = drive(seq, request, &ctx).await {
        report(&ctx, TraceAction::Fail { seq, error }).await;
    }
}

async fn drive(seq: u64, request: TraceRequest, ctx: &TraceContext) -> Result<(), TraceError> {
    let (origin, destination) = tokio::try_join!(
        resolve_source(&request.origin, ctx),
        resolve_source(&request.destination, ctx),
    )?;
    let origin = origin.validate().map_err(|_| TraceError::InvalidCoordinates)?;
    let destination = destination.validate().map_err(|_| TraceError::InvalidCoordinates)?;

    if !report(ctx, TraceAction::Resolved { seq, origin, destination }).await {
        return Ok(());
    }

    let body = RouteRequest {
        origin,
        destination,
        profile: request.profile,
    };
    let result = TraceResult::from(ctx.routing.route(&body).await?);
    let steps = result.analysis_steps.clone();

    if !report(ctx, TraceAction::Routed { seq, result }).await {
        return Ok(());
    }

    for line in steps {
        if !report(ctx, TraceAction::StreamStep { seq, line }).await {
            debug!("Superseded while streaming");
            return Ok(());
        }
        tokio::time::sleep(ctx.pacing).await;
    }

    report(ctx, TraceAction::Finish { seq }).await;
    Ok(())
}

async fn resolve_source(source: &PointSource, ctx: &TraceContext) -> Result<Point, TraceError> {
    match source {
        PointSource::Resolved(point) => Ok(*point),
        PointSource::Text(text) => Ok(ctx.resolver.resolve(text).await?),
        PointSource::LiveSelf => match &ctx.self_position {
            Some(feed) => feed.current_position().await.ok_or(TraceError::NoLiveFix),
            None => Err(TraceError::NoLiveFix),
        },
    }
}

/// Sends a report; true only if the session applied it.
async fn report(ctx: &TraceContext, action: TraceAction) -> bool {
    matches!(
        ctx.this.perform_action(action).await,
        Ok(TraceActionResult::Applied(true))
    )
}
