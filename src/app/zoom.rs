use eframe::egui::Modifiers;

use crate::repo::{Hierarchy, TreeNode};

pub(super) const ZOOM_DURATION_SECS: f64 = 0.75;

/// What a click on a circle asks for, decided by the held modifier keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ZoomIntent {
    ParentLevel,
    Reset,
    Toggle,
}

impl ZoomIntent {
    pub(super) fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.alt {
            Self::ParentLevel
        } else if modifiers.ctrl || modifiers.mac_cmd || modifiers.command {
            Self::Reset
        } else {
            Self::Toggle
        }
    }
}

/// Affine world-to-viewport mapping. Output is in units of the inner canvas
/// diameter, so `[0, 1]` spans the drawable square on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ViewTransform {
    pub(super) scale: f64,
    pub(super) offset_x: f64,
    pub(super) offset_y: f64,
}

impl ViewTransform {
    pub(super) fn for_focus(node: &TreeNode) -> Self {
        let scale = if node.r > 0.0 { 1.0 / (2.0 * node.r) } else { 1.0 };
        Self {
            scale,
            offset_x: -(node.x - node.r) * scale,
            offset_y: -(node.y - node.r) * scale,
        }
    }

    pub(super) fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.offset_x + x * self.scale,
            self.offset_y + y * self.scale,
        )
    }

    pub(super) fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            scale: mix(self.scale, other.scale),
            offset_x: mix(self.offset_x, other.offset_x),
            offset_y: mix(self.offset_y, other.offset_y),
        }
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct ViewTransition {
    from: ViewTransform,
    to: ViewTransform,
    started_at: f64,
    duration: f64,
}

impl ViewTransition {
    fn at_rest(view: ViewTransform) -> Self {
        Self {
            from: view,
            to: view,
            started_at: f64::NEG_INFINITY,
            duration: ZOOM_DURATION_SECS,
        }
    }

    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }

    fn view_at(&self, now: f64) -> ViewTransform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, ease_cubic_in_out(t))
    }
}

pub(super) struct ZoomState {
    focus: usize,
    transition: ViewTransition,
}

impl ZoomState {
    pub(super) fn new(tree: &Hierarchy) -> Self {
        Self {
            focus: Hierarchy::ROOT,
            transition: ViewTransition::at_rest(ViewTransform::for_focus(tree.root())),
        }
    }

    pub(super) fn focus(&self) -> usize {
        self.focus
    }

    pub(super) fn is_focused(&self, index: usize) -> bool {
        self.focus == index
    }

    pub(super) fn resolve_click(&self, tree: &Hierarchy, clicked: usize, intent: ZoomIntent) -> usize {
        match intent {
            ZoomIntent::ParentLevel => tree.parent_of(clicked).unwrap_or(Hierarchy::ROOT),
            ZoomIntent::Reset => Hierarchy::ROOT,
            ZoomIntent::Toggle if self.is_focused(clicked) => Hierarchy::ROOT,
            ZoomIntent::Toggle => clicked,
        }
    }

    /// Starts a transition towards `target`, beginning from wherever the view
    /// currently is so an interrupted zoom continues smoothly. Circles without
    /// area cannot be framed, so those zoom to their nearest sized ancestor.
    pub(super) fn zoom_to(&mut self, tree: &Hierarchy, target: usize, now: f64) {
        let target = if target < tree.len() { target } else { Hierarchy::ROOT };
        let target = tree
            .ancestry(target)
            .into_iter()
            .rev()
            .find(|&index| tree.node(index).r > 0.0)
            .unwrap_or(Hierarchy::ROOT);
        let current = self.transition.view_at(now);
        self.focus = target;
        self.transition = ViewTransition {
            from: current,
            to: ViewTransform::for_focus(tree.node(target)),
            started_at: now,
            duration: ZOOM_DURATION_SECS,
        };
    }

    pub(super) fn view_at(&self, now: f64) -> ViewTransform {
        self.transition.view_at(now)
    }

    pub(super) fn target_view(&self) -> ViewTransform {
        self.transition.to
    }

    pub(super) fn is_animating(&self, now: f64) -> bool {
        self.transition.progress(now) < 1.0
    }

    pub(super) fn label_visible(&self, tree: &Hierarchy, index: usize) -> bool {
        in_label_lens(tree.node(index).depth, tree.node(self.focus).depth)
    }
}

pub(super) fn in_label_lens(depth: usize, focus_depth: usize) -> bool {
    depth == focus_depth || depth == focus_depth + 1
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::repo::{LayoutOptions, build_repo_tree};

    fn tree() -> Hierarchy {
        build_repo_tree(
            r#"{"name": "repo", "children": [
                {"name": "src", "children": [
                    {"name": "app", "children": [{"name": "view.rs", "size": 50}]},
                    {"name": "main.rs", "size": 20}
                ]},
                {"name": "README.md", "size": 8}
            ]}"#,
            LayoutOptions::default(),
        )
        .expect("valid tree")
    }

    fn index_of(tree: &Hierarchy, name: &str) -> usize {
        tree.nodes()
            .iter()
            .position(|node| node.data.name == name)
            .expect("node exists")
    }

    #[test]
    fn starts_focused_on_root() {
        let tree = tree();
        let zoom = ZoomState::new(&tree);
        assert_eq!(zoom.focus(), Hierarchy::ROOT);
        assert!(!zoom.is_animating(0.0));
    }

    #[test]
    fn plain_click_focuses_then_resets() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);
        let src = index_of(&tree, "src");

        let target = zoom.resolve_click(&tree, src, ZoomIntent::Toggle);
        assert_eq!(target, src);
        zoom.zoom_to(&tree, target, 0.0);

        let again = zoom.resolve_click(&tree, src, ZoomIntent::Toggle);
        assert_eq!(again, Hierarchy::ROOT);
    }

    #[test]
    fn alt_click_moves_to_parent() {
        let tree = tree();
        let zoom = ZoomState::new(&tree);
        let view = index_of(&tree, "view.rs");
        let app = index_of(&tree, "app");
        assert_eq!(zoom.resolve_click(&tree, view, ZoomIntent::ParentLevel), app);
        assert_eq!(
            zoom.resolve_click(&tree, Hierarchy::ROOT, ZoomIntent::ParentLevel),
            Hierarchy::ROOT
        );
    }

    #[test]
    fn ctrl_click_resets_to_root() {
        let tree = tree();
        let zoom = ZoomState::new(&tree);
        let app = index_of(&tree, "app");
        assert_eq!(zoom.resolve_click(&tree, app, ZoomIntent::Reset), Hierarchy::ROOT);
    }

    #[test]
    fn modifiers_pick_intent() {
        let alt = Modifiers {
            alt: true,
            ctrl: true,
            ..Modifiers::default()
        };
        assert_eq!(ZoomIntent::from_modifiers(alt), ZoomIntent::ParentLevel);

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        assert_eq!(ZoomIntent::from_modifiers(ctrl), ZoomIntent::Reset);

        let cmd = Modifiers {
            mac_cmd: true,
            ..Modifiers::default()
        };
        assert_eq!(ZoomIntent::from_modifiers(cmd), ZoomIntent::Reset);
        assert_eq!(
            ZoomIntent::from_modifiers(Modifiers::default()),
            ZoomIntent::Toggle
        );
    }

    #[test]
    fn focus_circle_maps_onto_unit_square() {
        let tree = tree();
        let src = tree.node(index_of(&tree, "src"));
        let view = ViewTransform::for_focus(src);

        let (left, top) = view.apply(src.x - src.r, src.y - src.r);
        let (right, bottom) = view.apply(src.x + src.r, src.y + src.r);
        assert!(left.abs() < 1e-9 && top.abs() < 1e-9);
        assert!((right - 1.0).abs() < 1e-9 && (bottom - 1.0).abs() < 1e-9);
        assert!((view.scale * src.r * 2.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn transition_hits_endpoints_and_interrupts_from_current_view() {
        let tree = tree();
        let mut zoom = ZoomState::new(&tree);
        let root_view = zoom.view_at(0.0);
        let src = index_of(&tree, "src");

        zoom.zoom_to(&tree, src, 10.0);
        assert_eq!(zoom.view_at(10.0), root_view);
        assert!(zoom.is_animating(10.3));
        let target = ViewTransform::for_focus(tree.node(src));
        assert_eq!(zoom.view_at(10.0 + ZOOM_DURATION_SECS), target);
        assert!(!zoom.is_animating(10.0 + ZOOM_DURATION_SECS));

        let midway = zoom.view_at(10.3);
        zoom.zoom_to(&tree, Hierarchy::ROOT, 10.3);
        assert_eq!(zoom.view_at(10.3), midway);
        assert_eq!(zoom.target_view(), root_view);
    }

    #[test]
    fn easing_is_monotonic_with_fixed_ends() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        let mut last = 0.0;
        for step in 1..=100 {
            let value = ease_cubic_in_out(f64::from(step) / 100.0);
            assert!(value >= last);
            last = value;
        }
    }

    fn labelled(tree: &Hierarchy, zoom: &ZoomState) -> Vec<String> {
        let mut names = (0..tree.len())
            .filter(|&index| zoom.label_visible(tree, index))
            .map(|index| tree.node(index).data.name.clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Labels expected for each focus of the fixed sample tree.
    fn expected_labels(focus: &str) -> Vec<&'static str> {
        let mut names = match focus {
            "repo" => vec!["repo", "src", "README.md"],
            "src" => vec!["src", "app", "main.rs"],
            "README.md" => vec!["src", "README.md", "app", "main.rs"],
            "app" | "main.rs" => vec!["app", "main.rs", "view.rs"],
            "view.rs" => vec!["view.rs"],
            other => panic!("unexpected focus {other}"),
        };
        names.sort();
        names
    }

    #[test]
    fn zero_area_target_zooms_to_sized_ancestor() {
        let tree = build_repo_tree(
            r#"{"name": "repo", "children": [
                {"name": "src", "children": [
                    {"name": "empty.rs", "size": 0},
                    {"name": "lib.rs", "size": 12}
                ]},
                {"name": "blank", "children": [{"name": "none.rs", "size": 0}]}
            ]}"#,
            LayoutOptions::default(),
        )
        .expect("valid tree");
        let mut zoom = ZoomState::new(&tree);

        let empty = index_of(&tree, "empty.rs");
        assert_eq!(tree.node(empty).r, 0.0);
        zoom.zoom_to(&tree, empty, 0.0);
        let src = index_of(&tree, "src");
        assert_eq!(zoom.focus(), src);
        assert!(zoom.target_view().scale.is_finite());
        assert!((zoom.target_view().scale * tree.node(src).r * 2.0 - 1.0).abs() < 1e-9);

        // Padding gives a directory of empty files a small circle of its own.
        let blank = index_of(&tree, "blank");
        zoom.zoom_to(&tree, index_of(&tree, "none.rs"), 1.0);
        assert_eq!(zoom.focus(), blank);
        assert!(tree.node(blank).r > 0.0);
    }

    fn arb_intent() -> impl Strategy<Value = ZoomIntent> {
        prop::sample::select(vec![
            ZoomIntent::Toggle,
            ZoomIntent::ParentLevel,
            ZoomIntent::Reset,
        ])
    }

    proptest! {
        #[test]
        fn lens_matches_fixed_table_for_any_click_sequence(
            clicks in prop::collection::vec((0usize..6, arb_intent()), 1..16),
        ) {
            let tree = tree();
            let mut zoom = ZoomState::new(&tree);
            prop_assert_eq!(labelled(&tree, &zoom), expected_labels("repo"));

            for (step, (clicked, intent)) in clicks.into_iter().enumerate() {
                let target = zoom.resolve_click(&tree, clicked % tree.len(), intent);
                zoom.zoom_to(&tree, target, step as f64);

                let focus = tree.node(zoom.focus()).data.name.as_str();
                prop_assert_eq!(labelled(&tree, &zoom), expected_labels(focus));
            }
        }
    }
}
