use std::collections::BTreeMap;

use crate::error::EvalError;
use crate::model::points::{ClassSupportSet, LabeledPoint, PointSet};
use crate::model::sample::{Label, Sample};
use crate::pipeline::categorize::SampleCategory;

/// Builds the high-dimensional point list to project for one sample.
///
/// Ood/Confident: prototype and support examples of the most confident
/// class, then the sample itself. ConfusedClass: the same for the two
/// most confident classes. The sample is always last; `focus` records
/// its position.
///
/// Dimensionality agreement across points is an upstream guarantee; it
/// is not validated here and distance computation fails loudly if it
/// does not hold.
pub fn assemble(
    sample: &Sample,
    category: SampleCategory,
    support_sets: &BTreeMap<Label, ClassSupportSet>,
) -> Result<PointSet, EvalError> {
    let mut points = Vec::new();

    match category {
        SampleCategory::Ood | SampleCategory::Confident => {
            let idx = sample
                .confidences
                .argmax()
                .ok_or(EvalError::NotEnoughLabels(0))?;
            push_class(&mut points, sample.confidences.label(idx), support_sets)?;
        }
        SampleCategory::ConfusedClass => {
            let (first, second) = sample
                .confidences
                .top_two()
                .ok_or_else(|| EvalError::NotEnoughLabels(sample.confidences.len()))?;
            let first_label = sample.confidences.label(first);
            let second_label = sample.confidences.label(second);
            if first_label == second_label {
                return Err(EvalError::LabelCollision(first_label.clone()));
            }
            push_class(&mut points, first_label, support_sets)?;
            push_class(&mut points, second_label, support_sets)?;
        }
    }

    points.push(LabeledPoint {
        coordinates: sample.coordinates.clone(),
        label: sample.true_label.clone(),
        sample_index: sample.input_ref.as_ref().map(|r| r.index),
    });
    let focus = points.len() - 1;

    Ok(PointSet {
        points,
        focus: Some(focus),
    })
}

fn push_class(
    points: &mut Vec<LabeledPoint>,
    label: &Label,
    support_sets: &BTreeMap<Label, ClassSupportSet>,
) -> Result<(), EvalError> {
    let set = support_sets
        .get(label)
        .ok_or_else(|| EvalError::UnknownLabel(label.clone()))?;
    points.push(LabeledPoint::with_label(
        set.prototype.clone(),
        set.label.clone(),
    ));
    for example in &set.support_examples {
        points.push(LabeledPoint::with_label(example.clone(), set.label.clone()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/assemble.rs"]
mod tests;
