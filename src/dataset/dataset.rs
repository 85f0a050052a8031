use super::error::DatasetError;

pub trait Dataset {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;

    fn iter(&self) -> DatasetIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetIter {
            dataset: self,
            next_index: 0,
        }
    }
}

/// Loads samples in index order. A failed sample is yielded as an error and
/// iteration carries on with the next index.
pub struct DatasetIter<'a, D: Dataset> {
    dataset: &'a D,
    next_index: usize,
}

impl<D: Dataset> Iterator for DatasetIter<'_, D> {
    type Item = Result<D::Item, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.dataset.len() {
            return None;
        }
        let item = self.dataset.get(self.next_index);
        self.next_index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl<D: Dataset> ExactSizeIterator for DatasetIter<'_, D> {}
