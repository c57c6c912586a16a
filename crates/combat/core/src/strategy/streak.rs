//! Streak racks lock on before firing: without a lock nothing is launched,
//! with one the whole rack hits.

use crate::env::CombatEnv;
use crate::report::ReportId;
use crate::resolve::ResolutionContext;

/// Full rack on a lock. Streak volleys never consult the cluster table.
pub fn hit_count(ctx: &mut ResolutionContext) {
    ctx.hits_landed = ctx.weapon.profile.rack_size * ctx.shots_fired;
    ctx.salvo = ctx.hits_landed > 1;
}

/// No lock: nothing was fired, so only narration is produced.
pub fn no_lock(ctx: &mut ResolutionContext, env: &CombatEnv<'_>) {
    let ecm = env.rules.ecm_streak_miss_report && env.entities.is_ecm_affected(ctx.subject());
    let id = if ecm {
        ReportId::StreakNoLockEcm
    } else {
        ReportId::StreakNoLock
    };
    ctx.push_report(ctx.entry(id).indent(1));
}
