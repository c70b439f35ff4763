/// Double-click window in seconds.
const DOUBLE_CLICK_WINDOW: f64 = 0.3;

/// Turns raw button polling into click events. A second press inside the
/// double-click window drops a ball.
pub struct ClickState {
    left_was_down: bool,
    last_left_click_time: f64,
    /// Elapsed time since the runner started (accumulated).
    elapsed: f64,
    /// Set for one frame when a single click was detected.
    pub left_clicked: bool,
    /// Set for one frame when a double click was detected.
    pub double_clicked: bool,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            left_was_down: false,
            last_left_click_time: f64::NEG_INFINITY,
            elapsed: 0.0,
            left_clicked: false,
            double_clicked: false,
        }
    }

    /// Feed the button state once per frame.
    pub fn update(&mut self, left_down: bool, dt: f64) {
        self.elapsed += dt;
        self.left_clicked = false;
        self.double_clicked = false;

        // Edge-detect: press, not hold.
        if left_down && !self.left_was_down {
            if self.elapsed - self.last_left_click_time < DOUBLE_CLICK_WINDOW {
                self.double_clicked = true;
                // A third quick press starts a new pair.
                self.last_left_click_time = f64::NEG_INFINITY;
            } else {
                self.left_clicked = true;
                self.last_left_click_time = self.elapsed;
            }
        }
        self.left_was_down = left_down;
    }
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_release(click: &mut ClickState, dt: f64) -> (bool, bool) {
        click.update(true, dt);
        let result = (click.left_clicked, click.double_clicked);
        click.update(false, 0.016);
        result
    }

    #[test]
    fn quick_second_press_is_a_double_click() {
        let mut click = ClickState::new();
        assert_eq!(press_release(&mut click, 0.016), (true, false));
        assert_eq!(press_release(&mut click, 0.1), (false, true));
    }

    #[test]
    fn slow_presses_are_single_clicks() {
        let mut click = ClickState::new();
        assert_eq!(press_release(&mut click, 0.016), (true, false));
        assert_eq!(press_release(&mut click, 0.5), (true, false));
    }

    #[test]
    fn holding_the_button_does_not_repeat() {
        let mut click = ClickState::new();
        click.update(true, 0.016);
        assert!(click.left_clicked);
        click.update(true, 0.016);
        assert!(!click.left_clicked && !click.double_clicked);
    }
}
