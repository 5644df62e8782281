use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;

use crate::models::Sphere;
use crate::store::{nlargest, sum_by, Field, Measure, RecordStore};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategorySphereTotal {
    pub(crate) sphere: Sphere,
    pub(crate) category: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HierarchyLeaf {
    pub(crate) sphere: Sphere,
    pub(crate) party: String,
    pub(crate) category: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryShare {
    pub(crate) sphere: Sphere,
    pub(crate) category: String,
    pub(crate) total: Decimal,
    /// Share of the sphere's own total, 0–100 when all amounts are positive.
    pub(crate) percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SphereNode {
    pub(crate) sphere: Sphere,
    pub(crate) total: Decimal,
    pub(crate) parties: Vec<PartyNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartyNode {
    pub(crate) party: String,
    pub(crate) total: Decimal,
    pub(crate) categories: Vec<(String, Decimal)>,
}

/// Categories whose grand total ranks in the top `n`.
fn top_categories(store: &RecordStore, n: usize) -> IndexSet<String> {
    let totals = store.group_sum(&[Field::Category], Measure::Amount);
    nlargest(totals, n, |(_, total)| *total)
        .into_iter()
        .filter_map(|(mut key, _)| key.pop())
        .collect()
}

/// Totals per (sphere, category), restricted to the `top` categories overall.
pub(crate) fn category_by_sphere(store: &RecordStore, top: usize) -> Vec<CategorySphereTotal> {
    let keep = top_categories(store, top);
    sum_by(store.rows(), |t| Some((t.sphere.clone(), t.category.clone())))
        .into_iter()
        .filter(|((_, category), _)| keep.contains(category))
        .map(|((sphere, category), total)| CategorySphereTotal {
            sphere,
            category,
            total,
        })
        .collect()
}

/// Totals per (sphere, party, category). With `parties_per_sphere`, each
/// sphere only keeps its own top parties by total.
pub(crate) fn sphere_hierarchy(
    store: &RecordStore,
    parties_per_sphere: Option<usize>,
) -> Vec<HierarchyLeaf> {
    let leaves = sum_by(store.rows(), |t| {
        Some((t.sphere.clone(), t.party.clone(), t.category.clone()))
    });

    let keep: Option<IndexSet<(Sphere, String)>> = parties_per_sphere.map(|n| {
        let mut by_sphere: IndexMap<Sphere, Vec<(String, Decimal)>> = IndexMap::new();
        let party_totals = sum_by(store.rows(), |t| Some((t.sphere.clone(), t.party.clone())));
        for ((sphere, party), total) in party_totals {
            by_sphere.entry(sphere).or_default().push((party, total));
        }
        by_sphere
            .into_iter()
            .flat_map(|(sphere, parties)| {
                nlargest(parties, n, |(_, total)| *total)
                    .into_iter()
                    .map(move |(party, _)| (sphere.clone(), party))
            })
            .collect()
    });

    leaves
        .into_iter()
        .filter(|((sphere, party, _), _)| {
            keep.as_ref()
                .map_or(true, |k| k.contains(&(sphere.clone(), party.clone())))
        })
        .map(|((sphere, party, category), total)| HierarchyLeaf {
            sphere,
            party,
            category,
            total,
        })
        .collect()
}

/// Roll leaves up into sphere → party → category with subtotals, keeping
/// first-seen order at every level.
pub(crate) fn hierarchy_tree(leaves: &[HierarchyLeaf]) -> Vec<SphereNode> {
    let mut spheres: IndexMap<Sphere, IndexMap<String, Vec<(String, Decimal)>>> = IndexMap::new();
    for leaf in leaves {
        spheres
            .entry(leaf.sphere.clone())
            .or_default()
            .entry(leaf.party.clone())
            .or_default()
            .push((leaf.category.clone(), leaf.total));
    }

    spheres
        .into_iter()
        .map(|(sphere, parties)| {
            let parties: Vec<PartyNode> = parties
                .into_iter()
                .map(|(party, categories)| PartyNode {
                    party,
                    total: categories
                        .iter()
                        .map(|(_, t)| *t)
                        .fold(Decimal::ZERO, Decimal::saturating_add),
                    categories,
                })
                .collect();
            SphereNode {
                sphere,
                total: parties
                    .iter()
                    .map(|p| p.total)
                    .fold(Decimal::ZERO, Decimal::saturating_add),
                parties,
            }
        })
        .collect()
}

/// Each (sphere, category) total as a percentage of its sphere's total,
/// restricted to the `top` categories overall. Spheres whose total is zero
/// produce no rows.
pub(crate) fn composition_by_sphere(store: &RecordStore, top: usize) -> Vec<CategoryShare> {
    let sphere_totals = sum_by(store.rows(), |t| Some(t.sphere.clone()));
    let keep = top_categories(store, top);

    sum_by(store.rows(), |t| Some((t.sphere.clone(), t.category.clone())))
        .into_iter()
        .filter(|((_, category), _)| keep.contains(category))
        .filter_map(|((sphere, category), total)| {
            let sphere_total = sphere_totals.get(&sphere).copied()?;
            let percent = total
                .checked_div(sphere_total)?
                .checked_mul(Decimal::ONE_HUNDRED)?;
            Some(CategoryShare {
                sphere,
                category,
                total,
                percent,
            })
        })
        .collect()
}
