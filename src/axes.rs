use crate::error::ChartError;
use crate::record::Metric;

/// Fixed number of metric families one chart can carry
pub const MAX_AXES: usize = 3;

/// How far left of the plot the tertiary spine sits, as a fraction of plot width
pub const TERTIARY_SPINE_OFFSET: f64 = 0.24;

/// Where an axis draws its spine and tick labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisPosition {
    Left,
    Right,
    /// Left of the host spine, `offset` plot widths outward
    OffsetLeft { offset: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub metric: Metric,
    pub position: AxisPosition,
    /// Twins draw no background so the host grid stays visible
    pub patch_visible: bool,
}

/// One Y-axis per metric family, all sharing the host's X dimension
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSet {
    axes: Vec<Axis>,
}

impl AxisSet {
    pub fn allocate(datatypes: &[Metric]) -> Result<Self, ChartError> {
        let mut metrics: Vec<Metric> = datatypes.to_vec();
        metrics.sort();
        metrics.dedup();

        if metrics.is_empty() {
            return Err(ChartError::NoData);
        }
        if metrics.len() > MAX_AXES {
            return Err(ChartError::TooManyAxes {
                requested: metrics.len(),
                max: MAX_AXES,
            });
        }

        let axes = metrics
            .into_iter()
            .enumerate()
            .map(|(idx, metric)| match idx {
                0 => Axis {
                    metric,
                    position: AxisPosition::Left,
                    patch_visible: true,
                },
                1 => Axis {
                    metric,
                    position: AxisPosition::Right,
                    patch_visible: false,
                },
                _ => Axis {
                    metric,
                    position: AxisPosition::OffsetLeft {
                        offset: TERTIARY_SPINE_OFFSET,
                    },
                    patch_visible: false,
                },
            })
            .collect();

        Ok(Self { axes })
    }

    /// Index of the axis carrying `metric`
    pub fn index_of(&self, metric: Metric) -> Option<usize> {
        self.axes.iter().position(|a| a.metric == metric)
    }

    /// Host first, then secondary and tertiary
    pub fn iter(&self) -> std::slice::Iter<'_, Axis> {
        self.axes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_axis_per_metric() {
        for n in 1..=MAX_AXES {
            let axes = AxisSet::allocate(&Metric::all()[..n]).unwrap();
            assert_eq!(axes.iter().len(), n);
            assert_eq!(axes.iter().next().unwrap().position, AxisPosition::Left);
        }
    }

    #[test]
    fn test_canonical_order_and_dedup() {
        let axes = AxisSet::allocate(&[Metric::Bw, Metric::Iops, Metric::Bw]).unwrap();
        let metrics: Vec<Metric> = axes.iter().map(|a| a.metric).collect();
        assert_eq!(metrics, vec![Metric::Iops, Metric::Bw]);
        assert_eq!(axes.index_of(Metric::Bw), Some(1));
        assert_eq!(axes.index_of(Metric::Lat), None);
    }

    #[test]
    fn test_tertiary_is_offset_and_transparent() {
        let axes = AxisSet::allocate(&[Metric::Iops, Metric::Lat, Metric::Bw]).unwrap();
        let all: Vec<&Axis> = axes.iter().collect();
        assert_eq!(all[1].position, AxisPosition::Right);

        let third = all[2];
        assert_eq!(third.metric, Metric::Bw);
        assert!(!third.patch_visible);
        match third.position {
            AxisPosition::OffsetLeft { offset } => assert!(offset > 0.0),
            other => panic!("unexpected position {:?}", other),
        }
        assert_ne!(third.position, all[0].position);
    }

    #[test]
    fn test_rejects_too_many_or_none() {
        let err = AxisSet::allocate(&[Metric::Iops, Metric::Lat, Metric::Bw, Metric::Clat])
            .unwrap_err();
        assert_eq!(err, ChartError::TooManyAxes { requested: 4, max: 3 });
        assert_eq!(AxisSet::allocate(&[]).unwrap_err(), ChartError::NoData);
    }
}
