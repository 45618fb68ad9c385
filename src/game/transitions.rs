use crate::models::Phase;

/// Legal phase changes of the round state machine.
pub fn is_allowed(from: Phase, to: Phase) -> bool {
    use Phase::*;

    if from == to {
        return false;
    }
    match (from, to) {
        (GameOver, _) => false,
        (_, Suspended) => true,
        (Suspended, _) => true,
        (Idle, ChairDetection | AwaitingChairCount) => true,
        (ChairDetection, CalibrationCountdown | AwaitingChairCount) => true,
        (AwaitingChairCount, CalibrationCountdown) => true,
        (CalibrationCountdown, Playing) => true,
        (Playing, PausedSettling) => true,
        (PausedSettling, OccupancyCheck | ResumeCountdown | GameOver) => true,
        (OccupancyCheck, MismatchPause | ResumeCountdown | GameOver) => true,
        (MismatchPause, ResumeCountdown | GameOver) => true,
        (ResumeCountdown, Playing) => true,
        _ => false,
    }
}
