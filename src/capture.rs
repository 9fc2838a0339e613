/*
 * capture.rs
 *
 * Raw backtrace capture and the throw-site promotion heuristic.
 *
 * Frames are unresolved instruction pointers, innermost first. Symbolication
 * is the reporting backend's job, not ours.
 */

/// Default cap on captured frames.
pub const DEFAULT_MAX_FRAMES: usize = 64;

/// Capture up to `max_frames` raw instruction pointers from the caller's
/// stack. An unwinder that gives up early just yields fewer frames.
#[inline(never)]
pub fn capture_frames(max_frames: usize) -> Vec<usize> {
    let mut frames = Vec::with_capacity(max_frames);
    if max_frames == 0 {
        return frames;
    }

    backtrace::trace(|frame| {
        frames.push(frame.ip() as usize);
        frames.len() < max_frames
    });

    frames
}

/// Swap the innermost frame with frame `n - 2` when more than two frames
/// were captured. Returns whether the swap happened.
///
/// The innermost frames belong to the panic machinery and the observer
/// itself; in the steady-state call pattern frame `n - 2` is closer to the
/// raise site, so moving it to the front makes reports group by throw site.
/// This is a heuristic tuned for one call depth and can pick the wrong frame
/// for others.
///
/// ```
/// use cppdemo::capture::promote_throw_site;
///
/// let mut frames = vec![10, 20, 30, 40];
/// assert!(promote_throw_site(&mut frames));
/// assert_eq!(frames, [30, 20, 10, 40]);
///
/// let mut short = vec![10, 20];
/// assert!(!promote_throw_site(&mut short));
/// assert_eq!(short, [10, 20]);
/// ```
pub fn promote_throw_site(frames: &mut [usize]) -> bool {
    let n = frames.len();
    if n <= 2 {
        return false;
    }
    frames.swap(0, n - 2);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_respects_limit() {
        let frames = capture_frames(3);
        assert!(frames.len() <= 3);
        assert!(!frames.is_empty(), "test thread should have some frames");
    }

    #[test]
    fn test_capture_zero_limit() {
        assert!(capture_frames(0).is_empty());
    }

    #[test]
    fn test_capture_default_limit() {
        let frames = capture_frames(DEFAULT_MAX_FRAMES);
        assert!(frames.len() <= DEFAULT_MAX_FRAMES);
    }

    #[test]
    fn test_promote_three_frames() {
        /* n = 3: frame 0 trades places with frame 1 */
        let mut frames = vec![1, 2, 3];
        assert!(promote_throw_site(&mut frames));
        assert_eq!(frames, [2, 1, 3]);
    }

    #[test]
    fn test_promote_leaves_short_stacks() {
        let mut empty: Vec<usize> = Vec::new();
        assert!(!promote_throw_site(&mut empty));

        let mut one = vec![7];
        assert!(!promote_throw_site(&mut one));
        assert_eq!(one, [7]);
    }
}
