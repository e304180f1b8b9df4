use image::{GrayImage, Luma, RgbImage};
use tracing::debug;

use crate::color::{luma, ChannelOrder};
use crate::face_detector::{DetectorConfig, FaceBounds, FaceDetector};
use crate::geometry::FaceBox;

/// Relative edge tolerance under which two raw windows count as the same face.
const GROUP_EPS: f64 = 0.2;

/// Find the largest confirmed face in `image`.
///
/// Returns `None` when the image is empty or no candidate survives the
/// configured size and overlap filters. Among survivors the greatest area
/// wins; ties keep the first candidate the detector reported.
pub fn locate_largest_face(
    image: &RgbImage,
    order: ChannelOrder,
    detector: &dyn FaceDetector,
    config: &DetectorConfig,
) -> Option<FaceBox> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }

    let gray = to_intensity(image, order);
    let raw = detector.detect(&gray, config);
    let candidates = if detector.reports_raw_windows() {
        group_windows(&raw, config.min_neighbors)
    } else {
        raw.iter().map(FaceBounds::to_face_box).collect()
    };

    let face = select_largest(&candidates, config.min_face_size);
    debug!(
        raw = raw.len(),
        candidates = candidates.len(),
        ?face,
        "face search finished"
    );
    face
}

/// Single-channel intensity using the same luma weights as tone classification.
pub fn to_intensity(image: &RgbImage, order: ChannelOrder) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let rgb = order.to_rgb(pixel.0.map(f64::from));
        let value = luma(rgb).round().clamp(0.0, 255.0) as u8;
        gray.put_pixel(x, y, Luma([value]));
    }
    gray
}

fn select_largest(candidates: &[FaceBox], min_face_size: u32) -> Option<FaceBox> {
    candidates
        .iter()
        .filter(|face| face.width >= min_face_size && face.height >= min_face_size)
        .fold(None, |best: Option<FaceBox>, face| match best {
            Some(current) if current.area() >= face.area() => Some(current),
            _ => Some(*face),
        })
}

/// Merge overlapping raw windows and keep clusters with at least
/// `min_neighbors` members, each averaged into a single box.
///
/// A cluster of exactly `min_neighbors` windows is kept. OpenCV's
/// `groupRectangles` uses a strict `count > minNeighbors` instead, so a
/// setting of `n` here behaves like `n - 1` there.
///
/// Clusters come out in the order of their first member.
pub fn group_windows(raw: &[FaceBounds], min_neighbors: u32) -> Vec<FaceBox> {
    let boxes: Vec<FaceBox> = raw.iter().map(FaceBounds::to_face_box).collect();
    let mut parent: Vec<usize> = (0..boxes.len()).collect();

    for i in 0..boxes.len() {
        for j in 0..i {
            if similar(&boxes[i], &boxes[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    // Sums of x, y, w, h and member count, keyed by root index.
    let mut clusters: Vec<(usize, [i64; 4], u32)> = Vec::new();
    for (i, face) in boxes.iter().enumerate() {
        let root = find(&mut parent, i);
        let slot = match clusters.iter().position(|(r, _, _)| *r == root) {
            Some(slot) => slot,
            None => {
                clusters.push((root, [0; 4], 0));
                clusters.len() - 1
            }
        };
        let entry = &mut clusters[slot];
        entry.1[0] += face.x as i64;
        entry.1[1] += face.y as i64;
        entry.1[2] += face.width as i64;
        entry.1[3] += face.height as i64;
        entry.2 += 1;
    }

    clusters
        .into_iter()
        .filter(|(_, _, count)| *count >= min_neighbors)
        .map(|(_, sums, count)| {
            let mean = |sum: i64| (sum as f64 / count as f64).round();
            FaceBox::new(
                mean(sums[0]) as i32,
                mean(sums[1]) as i32,
                mean(sums[2]) as u32,
                mean(sums[3]) as u32,
            )
        })
        .collect()
}

fn similar(a: &FaceBox, b: &FaceBox) -> bool {
    let delta = GROUP_EPS * (a.width.min(b.width) + a.height.min(b.height)) as f64 * 0.5;
    let close = |p: i64, q: i64| ((p - q).abs() as f64) <= delta;
    let (ax, ay, bx, by) = (a.x as i64, a.y as i64, b.x as i64, b.y as i64);
    close(ax, bx)
        && close(ay, by)
        && close(ax + a.width as i64, bx + b.width as i64)
        && close(ay + a.height as i64, by + b.height as i64)
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}
