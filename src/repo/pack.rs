//! Circle packing for the hierarchy.
//!
//! Sibling placement uses the front-chain method and each group is wrapped in its
//! minimal enclosing circle (randomized Welzl). The random source is a fixed-seed
//! LCG so a given input always packs the same way.

use super::hierarchy::{Hierarchy, TreeNode};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Circle {
    x: f64,
    y: f64,
    r: f64,
}

struct Lcg {
    state: u64,
}

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    fn new() -> Self {
        Self { state: 1 }
    }

    fn next_unit(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }
}

/// Lays out every node of `tree` inside a `size` x `size` square.
pub(super) fn pack(tree: &mut Hierarchy, size: f64, padding: f64) {
    let nodes = tree.nodes_mut();
    if nodes.is_empty() {
        return;
    }

    let mut random = Lcg::new();
    nodes[Hierarchy::ROOT].x = size / 2.0;
    nodes[Hierarchy::ROOT].y = size / 2.0;

    for node in nodes.iter_mut() {
        if node.is_leaf() {
            let radius = node.value.sqrt();
            node.r = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        }
    }

    pack_children(nodes, 0.0, &mut random);
    let scale_hint = nodes[Hierarchy::ROOT].r / size;
    pack_children(nodes, padding * scale_hint, &mut random);

    let root_r = nodes[Hierarchy::ROOT].r;
    if root_r.is_nan() || root_r <= 0.0 {
        for node in nodes.iter_mut() {
            node.x = size / 2.0;
            node.y = size / 2.0;
            node.r = 0.0;
        }
        return;
    }

    let k = size / (2.0 * root_r);
    for index in 0..nodes.len() {
        nodes[index].r *= k;
        if let Some(parent) = nodes[index].parent {
            let (px, py) = (nodes[parent].x, nodes[parent].y);
            nodes[index].x = px + k * nodes[index].x;
            nodes[index].y = py + k * nodes[index].y;
        }
    }
}

// Children always sit after their parent in the arena, so walking it backwards
// visits every child group before the node that encloses it.
fn pack_children(nodes: &mut [TreeNode], padding: f64, random: &mut Lcg) {
    let mut circles = Vec::new();
    for index in (0..nodes.len()).rev() {
        if nodes[index].is_leaf() {
            continue;
        }

        circles.clear();
        circles.extend(nodes[index].children.iter().map(|&child| Circle {
            x: 0.0,
            y: 0.0,
            r: nodes[child].r + padding,
        }));

        let enclosing = pack_siblings(&mut circles, random);

        let children = nodes[index].children.clone();
        for (circle, &child) in circles.iter().zip(children.iter()) {
            let node = &mut nodes[child];
            node.x = circle.x;
            node.y = circle.y;
            node.r = circle.r - padding;
        }
        nodes[index].r = enclosing + padding;
    }
}

fn pack_siblings(circles: &mut [Circle], random: &mut Lcg) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    circles[2] = place(circles[1], circles[0], circles[2]);

    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let mut i = 3;
    'pack: while i < n {
        circles[i] = place(circles[a], circles[b], circles[i]);
        let c = i;

        // Look for the nearest front-chain circle that overlaps c, walking
        // outwards from a and b by accumulated radius.
        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (circles[b].r, circles[a].r);
        loop {
            if sj <= sk {
                if intersects(circles[j], circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(circles[k], circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        let mut best = score(circles, &next, a);
        let mut cursor = next[c];
        while cursor != b {
            let candidate = score(circles, &next, cursor);
            if candidate < best {
                a = cursor;
                best = candidate;
            }
            cursor = next[cursor];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }
    let enclosing = enclose(&chain, random);

    for circle in circles.iter_mut() {
        circle.x -= enclosing.x;
        circle.y -= enclosing.y;
    }
    enclosing.r
}

fn place(b: Circle, a: Circle, c: Circle) -> Circle {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    let mut placed = c;

    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            placed.x = b.x - x * dx - y * dy;
            placed.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            placed.x = a.x + x * dx - y * dy;
            placed.y = a.y + x * dy + y * dx;
        }
    } else {
        placed.x = a.x + c.r;
        placed.y = a.y;
    }
    placed
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

fn shuffle(circles: &mut [Circle], random: &mut Lcg) {
    let mut m = circles.len();
    while m > 0 {
        let i = (random.next_unit() * m as f64) as usize;
        m -= 1;
        circles.swap(m, i.min(m));
    }
}

fn enclose(circles: &[Circle], random: &mut Lcg) -> Circle {
    let mut shuffled = circles.to_vec();
    shuffle(&mut shuffled, random);

    let mut basis: Vec<Circle> = Vec::new();
    let mut enclosing: Option<Circle> = None;
    let mut i = 0;
    while i < shuffled.len() {
        let p = shuffled[i];
        if let Some(current) = enclosing
            && encloses_weak(current, p)
        {
            i += 1;
        } else {
            basis = extend_basis(&basis, p);
            enclosing = Some(enclose_basis(&basis));
            i = 0;
        }
    }
    enclosing.unwrap_or_default()
}

fn extend_basis(basis: &[Circle], p: Circle) -> Vec<Circle> {
    if encloses_weak_all(p, basis) {
        return vec![p];
    }

    for &b in basis {
        if encloses_not(p, b) && encloses_weak_all(enclose_basis2(b, p), basis) {
            return vec![b, p];
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(enclose_basis2(bi, bj), p)
                && encloses_not(enclose_basis2(bi, p), bj)
                && encloses_not(enclose_basis2(bj, p), bi)
                && encloses_weak_all(enclose_basis3(bi, bj, p), basis)
            {
                return vec![bi, bj, p];
            }
        }
    }

    // Only reachable through floating point degeneracy.
    vec![p]
}

fn encloses_not(a: Circle, b: Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: Circle, b: Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|&b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(*a, *b),
        [a, b, c] => enclose_basis3(*a, *b, *c),
        _ => Circle::default(),
    }
}

fn enclose_basis2(a: Circle, b: Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    Circle {
        x: (a.x + b.x + x21 / l * r21) / 2.0,
        y: (a.y + b.y + y21 / l * r21) / 2.0,
        r: (l + a.r + b.r) / 2.0,
    }
}

fn enclose_basis3(a: Circle, b: Circle, c: Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle {
        x: x1 + xa + xb * r,
        y: y1 + ya + yb * r,
        r,
    }
}
